use rusqlite::{params, Connection};
use tracing::trace;

/// Associative tables linking two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `(author_id, article_id)`
    AuthorArticle,
    /// `(author_id, affiliation_id)`
    AuthorAffiliation,
    /// `(keyword_id, article_id)`
    ArticleKeyword,
    /// `(label_id, article_id)`
    ArticleLabel,
}

impl LinkKind {
    pub fn table(&self) -> &'static str {
        match self {
            LinkKind::AuthorArticle => "author_articles",
            LinkKind::AuthorAffiliation => "author_affiliations",
            LinkKind::ArticleKeyword => "article_keywords",
            LinkKind::ArticleLabel => "article_labels",
        }
    }

    fn insert_sql(&self) -> &'static str {
        match self {
            LinkKind::AuthorArticle => {
                "INSERT OR IGNORE INTO author_articles (author_id, article_id) VALUES (?1, ?2)"
            }
            LinkKind::AuthorAffiliation => {
                "INSERT OR IGNORE INTO author_affiliations (author_id, affiliation_id) VALUES (?1, ?2)"
            }
            LinkKind::ArticleKeyword => {
                "INSERT OR IGNORE INTO article_keywords (keyword_id, article_id) VALUES (?1, ?2)"
            }
            LinkKind::ArticleLabel => {
                "INSERT OR IGNORE INTO article_labels (label_id, article_id) VALUES (?1, ?2)"
            }
        }
    }

    /// Whether a repeated link signals redundant source data worth reporting.
    ///
    /// Authors legitimately reappear with the same article or affiliation;
    /// a repeated keyword or label on one article does not.
    pub fn counts_duplicates(&self) -> bool {
        matches!(self, LinkKind::ArticleKeyword | LinkKind::ArticleLabel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// The pair was already linked; nothing was written.
    Duplicate,
}

/// Links `id_a` to `id_b`, in the column order documented on [`LinkKind`].
pub fn link(
    conn: &Connection,
    kind: LinkKind,
    id_a: i64,
    id_b: i64,
) -> rusqlite::Result<LinkOutcome> {
    let changed = conn.execute(kind.insert_sql(), params![id_a, id_b])?;
    let outcome = if changed == 0 {
        LinkOutcome::Duplicate
    } else {
        LinkOutcome::Created
    };
    trace!(table = kind.table(), id_a, id_b, ?outcome, "Link");
    Ok(outcome)
}
