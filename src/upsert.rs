//! Insert-or-fetch against the schema's unique keys.
//!
//! Lookups and inserts run on whatever transaction the caller holds. The
//! select-then-insert pair is only atomic because a run has a single writer;
//! the unique constraints still reject duplicates if that ever changes.

use crate::models::{ArticleRecord, KeywordType, PublicationRecord};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::trace;

/// Unique key of an entity, plus the non-key fields needed to insert it.
#[derive(Debug, Clone, Copy)]
pub enum EntityKey<'a> {
    Publication(&'a PublicationRecord),
    Author(&'a str),
    Affiliation(&'a str),
    Keyword { term: &'a str, kind: KeywordType },
    Label { name: &'a str, kind: &'a str },
}

impl EntityKey<'_> {
    pub fn table(&self) -> &'static str {
        match self {
            EntityKey::Publication(_) => "publications",
            EntityKey::Author(_) => "authors",
            EntityKey::Affiliation(_) => "affiliations",
            EntityKey::Keyword { .. } => "keywords",
            EntityKey::Label { .. } => "labels",
        }
    }

    fn find(&self, conn: &Connection) -> rusqlite::Result<Option<i64>> {
        let id = |sql: &str, params: &[&dyn rusqlite::ToSql]| {
            conn.query_row(sql, params, |row| row.get(0)).optional()
        };
        match self {
            EntityKey::Publication(p) => {
                id("SELECT id FROM publications WHERE title = ?1", &[&p.title])
            }
            EntityKey::Author(name) => id("SELECT id FROM authors WHERE name = ?1", &[name]),
            EntityKey::Affiliation(name) => {
                id("SELECT id FROM affiliations WHERE name = ?1", &[name])
            }
            EntityKey::Keyword { term, kind } => id(
                "SELECT id FROM keywords WHERE term = ?1 AND type = ?2",
                &[term, &kind.as_str()],
            ),
            EntityKey::Label { name, kind } => id(
                "SELECT id FROM labels WHERE name = ?1 AND type = ?2",
                &[name, kind],
            ),
        }
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        match self {
            EntityKey::Publication(p) => conn.execute(
                "INSERT INTO publications (title, publisher, meeting_date) VALUES (?1, ?2, ?3)",
                params![p.title, p.publisher, p.meeting_date],
            ),
            EntityKey::Author(name) => {
                conn.execute("INSERT INTO authors (name) VALUES (?1)", params![name])
            }
            EntityKey::Affiliation(name) => {
                conn.execute("INSERT INTO affiliations (name) VALUES (?1)", params![name])
            }
            EntityKey::Keyword { term, kind } => conn.execute(
                "INSERT INTO keywords (term, type) VALUES (?1, ?2)",
                params![term, kind.as_str()],
            ),
            EntityKey::Label { name, kind } => conn.execute(
                "INSERT INTO labels (name, type) VALUES (?1, ?2)",
                params![name, kind],
            ),
        }
    }
}

/// Returns the id of the row matching `key`, inserting it first if absent.
pub fn upsert(conn: &Connection, key: &EntityKey<'_>) -> rusqlite::Result<i64> {
    if let Some(id) = key.find(conn)? {
        trace!(table = key.table(), id, "Found existing row");
        return Ok(id);
    }
    key.insert(conn)?;
    let id = conn.last_insert_rowid();
    trace!(table = key.table(), id, "Inserted row");
    Ok(id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleInsert {
    Inserted(i64),
    /// A unique or foreign-key constraint rejected the article; nothing was written.
    Conflict { reason: String },
}

/// Inserts an article together with its publication.
///
/// Both writes share a savepoint, so a constraint violation leaves neither
/// behind. Errors other than constraint violations are returned as-is.
pub fn insert_article(
    conn: &Connection,
    publication: &PublicationRecord,
    article: &ArticleRecord,
) -> rusqlite::Result<ArticleInsert> {
    conn.execute_batch("SAVEPOINT article_insert")?;

    match write_article(conn, publication, article) {
        Ok(id) => {
            conn.execute_batch("RELEASE article_insert")?;
            Ok(ArticleInsert::Inserted(id))
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK TO article_insert; RELEASE article_insert")?;
            if is_constraint_violation(&e) {
                Ok(ArticleInsert::Conflict {
                    reason: e.to_string(),
                })
            } else {
                Err(e)
            }
        }
    }
}

fn write_article(
    conn: &Connection,
    publication: &PublicationRecord,
    article: &ArticleRecord,
) -> rusqlite::Result<i64> {
    let publication_id = if publication.title.is_empty() {
        None
    } else {
        Some(upsert(conn, &EntityKey::Publication(publication))?)
    };

    conn.execute(
        "INSERT INTO articles (
            title, abstract, xplore_date, pub_year, volume, issue, start_page,
            end_page, issn, isbn, doi, funding_info, pdf_link, citation_count,
            reference_count, copyright_year, license, online_date,
            document_identifier, publication_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            article.title,
            article.abstract_text,
            article.xplore_date,
            article.pub_year,
            article.volume,
            article.issue,
            article.start_page,
            article.end_page,
            article.issn,
            article.isbn,
            article.doi,
            article.funding_info,
            article.pdf_link,
            article.citation_count,
            article.reference_count,
            article.copyright_year,
            article.license,
            article.online_date,
            article.document_identifier,
            publication_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Resolves an article by title and year; a missing year matches a NULL year.
pub fn lookup_article(
    conn: &Connection,
    title: &str,
    pub_year: Option<i64>,
) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM articles WHERE title = ?1 AND pub_year IS ?2",
        params![title.trim(), pub_year],
        |row| row.get(0),
    )
    .optional()
}

pub fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT count(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    fn publication(title: &str) -> PublicationRecord {
        PublicationRecord {
            title: title.to_string(),
            publisher: "IEEE".to_string(),
            meeting_date: "6-9 Nov. 2017".to_string(),
        }
    }

    fn article(title: &str, year: Option<i64>) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            pub_year: year,
            ..Default::default()
        }
    }

    #[test]
    fn upsert_is_idempotent() {
        let conn = open_in_memory().unwrap();
        let keys = [
            EntityKey::Author("Y. Liu"),
            EntityKey::Affiliation("MIT"),
            EntityKey::Keyword {
                term: "ZigBee",
                kind: KeywordType::Author,
            },
            EntityKey::Label {
                name: "Microgrids",
                kind: "sgsma_manual",
            },
        ];
        for key in &keys {
            let first = upsert(&conn, key).unwrap();
            let second = upsert(&conn, key).unwrap();
            assert_eq!(first, second, "{}", key.table());
            assert_eq!(count(&conn, key.table()), 1);
        }
    }

    #[test]
    fn keyword_type_is_part_of_key() {
        let conn = open_in_memory().unwrap();
        let a = upsert(
            &conn,
            &EntityKey::Keyword {
                term: "ZigBee",
                kind: KeywordType::Author,
            },
        )
        .unwrap();
        let b = upsert(
            &conn,
            &EntityKey::Keyword {
                term: "ZigBee",
                kind: KeywordType::Ieee,
            },
        )
        .unwrap();
        assert_ne!(a, b);
        assert_eq!(count(&conn, "keywords"), 2);
    }

    #[test]
    fn article_insert_creates_publication_once() {
        let conn = open_in_memory().unwrap();
        let pub_rec = publication("SmartGridComm");
        let first = insert_article(&conn, &pub_rec, &article("A", Some(2017))).unwrap();
        let second = insert_article(&conn, &pub_rec, &article("B", Some(2017))).unwrap();
        assert!(matches!(first, ArticleInsert::Inserted(_)));
        assert!(matches!(second, ArticleInsert::Inserted(_)));
        assert_eq!(count(&conn, "publications"), 1);
        assert_eq!(count(&conn, "articles"), 2);
    }

    #[test]
    fn duplicate_article_conflicts_without_partial_rows() {
        let conn = open_in_memory().unwrap();
        insert_article(&conn, &publication("First venue"), &article("A", Some(2017))).unwrap();

        let result =
            insert_article(&conn, &publication("Second venue"), &article("A", Some(2017)))
                .unwrap();
        match result {
            ArticleInsert::Conflict { reason } => assert!(reason.contains("UNIQUE")),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(count(&conn, "articles"), 1);
        assert_eq!(count(&conn, "publications"), 1);
    }

    #[test]
    fn undated_duplicate_article_conflicts() {
        let conn = open_in_memory().unwrap();
        let pub_rec = publication("Venue");
        let first = insert_article(&conn, &pub_rec, &article("Grid Sensing", None)).unwrap();
        let second = insert_article(&conn, &pub_rec, &article("Grid Sensing", None)).unwrap();
        assert!(matches!(first, ArticleInsert::Inserted(_)));
        assert!(matches!(second, ArticleInsert::Conflict { .. }));
        assert_eq!(count(&conn, "articles"), 1);
    }

    #[test]
    fn same_title_different_year_is_distinct() {
        let conn = open_in_memory().unwrap();
        let pub_rec = publication("Venue");
        insert_article(&conn, &pub_rec, &article("A", Some(2017))).unwrap();
        let result = insert_article(&conn, &pub_rec, &article("A", Some(2018))).unwrap();
        assert!(matches!(result, ArticleInsert::Inserted(_)));
    }

    #[test]
    fn empty_publication_title_leaves_reference_null() {
        let conn = open_in_memory().unwrap();
        insert_article(&conn, &publication(""), &article("A", None)).unwrap();
        assert_eq!(count(&conn, "publications"), 0);
        let pub_id: Option<i64> = conn
            .query_row("SELECT publication_id FROM articles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(pub_id, None);
    }

    #[test]
    fn lookup_matches_title_and_year() {
        let conn = open_in_memory().unwrap();
        let pub_rec = publication("Venue");
        let id = match insert_article(&conn, &pub_rec, &article("A", Some(2017))).unwrap() {
            ArticleInsert::Inserted(id) => id,
            other => panic!("unexpected {:?}", other),
        };
        insert_article(&conn, &pub_rec, &article("Undated", None)).unwrap();

        assert_eq!(lookup_article(&conn, " A ", Some(2017)).unwrap(), Some(id));
        assert_eq!(lookup_article(&conn, "A", Some(2018)).unwrap(), None);
        assert_eq!(lookup_article(&conn, "B", Some(2017)).unwrap(), None);
        assert!(lookup_article(&conn, "Undated", None).unwrap().is_some());
    }
}
