//! Drives one wrangling run: read, normalize, upsert, link, collect errors.

use crate::config::{columns, CATEGORY_COLUMNS, DOC_COLUMNS, PROGRESS_INTERVAL};
use crate::db;
use crate::errors::{ErrorCollector, WrangleError};
use crate::link::{link, LinkKind, LinkOutcome};
use crate::models::{ArticleRecord, KeywordType};
use crate::normalize;
use crate::reader::{CsvSource, RawRow};
use crate::report::Report;
use crate::stats::WrangleStats;
use crate::upsert::{insert_article, lookup_article, upsert, ArticleInsert, EntityKey};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rusqlite::Connection;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct WrangleConfig {
    pub docs: Vec<PathBuf>,
    pub cats: Vec<PathBuf>,
    pub db_path: PathBuf,
    pub force: bool,
}

pub struct WrangleOutcome {
    pub stats: WrangleStats,
    pub report: Report,
}

/// Runs the full pipeline against the database at `config.db_path`.
///
/// Every input is opened and its header checked before the database is
/// touched, so a missing or malformed file fails the run without writing.
pub fn run_wrangle(config: &WrangleConfig) -> Result<WrangleOutcome> {
    let docs = config
        .docs
        .iter()
        .map(|path| CsvSource::open(path, DOC_COLUMNS))
        .collect::<Result<Vec<_>, _>>()?;
    let cats = config
        .cats
        .iter()
        .map(|path| CsvSource::open(path, CATEGORY_COLUMNS))
        .collect::<Result<Vec<_>, _>>()?;

    let mut conn = db::open_database(&config.db_path, config.force)?;
    let mut wrangler = Wrangler::new();

    for source in docs {
        wrangler.load_documents(&mut conn, source)?;
    }
    for source in cats {
        wrangler.load_categories(&mut conn, source)?;
    }

    Ok(wrangler.finish())
}

/// Accumulates errors and statistics across the files of one run.
#[derive(Default)]
pub struct Wrangler {
    errors: ErrorCollector,
    stats: WrangleStats,
}

impl Wrangler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> WrangleOutcome {
        WrangleOutcome {
            stats: self.stats,
            report: Report::from_errors(self.errors.into_errors()),
        }
    }

    /// Loads a document metadata export in a single transaction.
    pub fn load_documents(&mut self, conn: &mut Connection, source: CsvSource) -> Result<()> {
        let path = source.path().display().to_string();
        info!(path = %path, "Loading documents");
        let pb = spinner(&path);

        let tx = conn.transaction()?;
        let mut rows = 0u64;
        for row in source {
            let row = row?;
            self.stats.inc_doc_rows();
            self.process_document(&tx, &row)
                .with_context(|| format!("Failed to wrangle line {} of {}", row.line(), path))?;
            rows += 1;
            if rows % PROGRESS_INTERVAL == 0 {
                pb.set_message(format!("{path}: {rows} rows"));
                pb.tick();
            }
        }
        tx.commit()
            .with_context(|| format!("Failed to commit documents from {}", path))?;

        pb.finish_and_clear();
        info!(path = %path, rows, "Documents loaded");
        Ok(())
    }

    /// Loads a categories export, labelling already-loaded articles.
    pub fn load_categories(&mut self, conn: &mut Connection, source: CsvSource) -> Result<()> {
        let path = source.path().display().to_string();
        info!(path = %path, "Loading categories");
        let pb = spinner(&path);

        let tx = conn.transaction()?;
        let mut rows = 0u64;
        for row in source {
            let row = row?;
            self.stats.inc_category_rows();
            self.process_category(&tx, &row)
                .with_context(|| format!("Failed to wrangle line {} of {}", row.line(), path))?;
            rows += 1;
            if rows % PROGRESS_INTERVAL == 0 {
                pb.set_message(format!("{path}: {rows} rows"));
                pb.tick();
            }
        }
        tx.commit()
            .with_context(|| format!("Failed to commit categories from {}", path))?;

        pb.finish_and_clear();
        info!(path = %path, rows, "Categories loaded");
        Ok(())
    }

    fn process_document(&mut self, conn: &Connection, row: &RawRow) -> Result<()> {
        let publication = normalize::publication_record(row);
        let article = normalize::article_record(row);
        let pub_year = row.get(columns::PUB_YEAR).trim().to_string();

        let article_id = match insert_article(conn, &publication, &article)? {
            ArticleInsert::Inserted(id) => {
                self.stats.inc_articles();
                id
            }
            ArticleInsert::Conflict { reason } => {
                self.errors.record(WrangleError::ArticleInsertFailed {
                    title: article.title,
                    pub_year,
                    reason,
                });
                return Ok(());
            }
        };

        self.link_authors(conn, row, &article, &pub_year, article_id)?;
        self.link_keywords(conn, row, &article, &pub_year, article_id)?;
        Ok(())
    }

    fn link_authors(
        &mut self,
        conn: &Connection,
        row: &RawRow,
        article: &ArticleRecord,
        pub_year: &str,
        article_id: i64,
    ) -> Result<()> {
        let (authors, duplicates) = normalize::author_entries(row);

        for author in &authors {
            let author_id = upsert(conn, &EntityKey::Author(&author.name))?;
            self.link_pair(conn, LinkKind::AuthorArticle, author_id, article_id)?;

            if let Some(affiliation) = &author.affiliation {
                let affiliation_id = upsert(conn, &EntityKey::Affiliation(affiliation))?;
                self.link_pair(conn, LinkKind::AuthorAffiliation, author_id, affiliation_id)?;
            }
        }

        if !duplicates.is_empty() {
            self.errors.record(WrangleError::NonuniqueAuthorName {
                title: article.title.clone(),
                pub_year: pub_year.to_string(),
                article_id,
                duplicates,
            });
        }
        Ok(())
    }

    fn link_keywords(
        &mut self,
        conn: &Connection,
        row: &RawRow,
        article: &ArticleRecord,
        pub_year: &str,
        article_id: i64,
    ) -> Result<()> {
        let mut occurrences: FxHashMap<(String, KeywordType), u32> = FxHashMap::default();

        for keyword in normalize::keyword_entries(row) {
            let occurrence = {
                let n = occurrences
                    .entry((keyword.term.clone(), keyword.kind))
                    .or_insert(0);
                *n += 1;
                *n
            };

            let keyword_id = upsert(
                conn,
                &EntityKey::Keyword {
                    term: &keyword.term,
                    kind: keyword.kind,
                },
            )?;

            if self.link_pair(conn, LinkKind::ArticleKeyword, keyword_id, article_id)?
                == LinkOutcome::Duplicate
            {
                self.errors.record(WrangleError::DuplicateKeyword {
                    title: article.title.clone(),
                    pub_year: pub_year.to_string(),
                    article_id,
                    term: keyword.term,
                    term_type: keyword.kind.to_string(),
                    occurrence,
                });
            }
        }
        Ok(())
    }

    fn process_category(&mut self, conn: &Connection, row: &RawRow) -> Result<()> {
        let label = normalize::label_record(row);

        let Some(article_id) = lookup_article(conn, &label.title, label.pub_year)? else {
            self.errors.record(WrangleError::LabelLookupFailed {
                title: label.title,
                pub_year: label.raw_year,
                label: label.name,
            });
            return Ok(());
        };

        // No label to link; reported like a rejected assignment.
        if label.name.is_empty() {
            self.errors.record(WrangleError::LabelAssignFailed {
                title: label.title,
                pub_year: label.raw_year,
                label: label.name,
                article_id,
                label_id: None,
            });
            return Ok(());
        }

        let label_id = upsert(
            conn,
            &EntityKey::Label {
                name: &label.name,
                kind: &label.kind,
            },
        )?;

        let outcome = self.link_pair(conn, LinkKind::ArticleLabel, label_id, article_id)?;
        if outcome == LinkOutcome::Duplicate {
            self.errors.record(WrangleError::LabelAssignFailed {
                title: label.title,
                pub_year: label.raw_year,
                label: label.name,
                article_id,
                label_id: Some(label_id),
            });
        }
        Ok(())
    }

    /// Links a pair and counts it; duplicates are left for the caller to judge.
    fn link_pair(
        &mut self,
        conn: &Connection,
        kind: LinkKind,
        id_a: i64,
        id_b: i64,
    ) -> Result<LinkOutcome> {
        let outcome = link(conn, kind, id_a, id_b)
            .with_context(|| format!("Failed to link {} ({}, {})", kind.table(), id_a, id_b))?;

        if outcome == LinkOutcome::Created {
            match kind {
                LinkKind::AuthorArticle => self.stats.inc_author_links(),
                LinkKind::AuthorAffiliation => self.stats.inc_affiliation_links(),
                LinkKind::ArticleKeyword => self.stats.inc_keyword_links(),
                LinkKind::ArticleLabel => self.stats.inc_label_links(),
            }
        } else if !kind.counts_duplicates() {
            debug!(table = kind.table(), id_a, id_b, "Ignoring repeated link");
        }
        Ok(outcome)
    }
}

fn spinner(path: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(path.to_string());
    pb
}
