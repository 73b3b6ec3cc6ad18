use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::info;

const SCHEMA: &str = include_str!("schema.sql");

/// Opens the target database, creating the schema when absent.
///
/// An existing database is appended to unless `force` is set, in which case
/// it is deleted first.
pub fn open_database(path: &Path, force: bool) -> Result<Connection> {
    if path.exists() {
        if force {
            info!(path = %path.display(), "Removing existing database");
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove database: {}", path.display()))?;
        } else {
            info!(path = %path.display(), "Appending to existing database");
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    bootstrap(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    bootstrap(&conn)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .context("Failed to enable foreign keys")?;
    conn.execute_batch(SCHEMA).context("Failed to apply schema")?;
    Ok(())
}

/// Row count of every user table, sorted by table name.
pub fn table_counts(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    tables
        .into_iter()
        .map(|table| {
            let count: i64 = conn
                .query_row(&format!("SELECT count(*) FROM \"{}\"", table), [], |row| {
                    row.get(0)
                })
                .with_context(|| format!("Failed to count rows in {}", table))?;
            Ok((table, count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn schema_creates_all_tables() {
        let conn = open_in_memory().unwrap();
        let names: Vec<String> = table_counts(&conn)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "affiliations",
                "article_keywords",
                "article_labels",
                "articles",
                "author_affiliations",
                "author_articles",
                "authors",
                "keywords",
                "labels",
                "publications",
            ]
        );
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }

    #[test]
    fn reopening_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("biblio.db");

        {
            let conn = open_database(&path, false).unwrap();
            conn.execute("INSERT INTO authors (name) VALUES ('Y. Liu')", [])
                .unwrap();
        }

        let conn = open_database(&path, false).unwrap();
        let counts = table_counts(&conn).unwrap();
        assert!(counts.contains(&("authors".to_string(), 1)));
    }

    #[test]
    fn force_recreates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("biblio.db");

        {
            let conn = open_database(&path, false).unwrap();
            conn.execute("INSERT INTO authors (name) VALUES ('Y. Liu')", [])
                .unwrap();
        }

        let conn = open_database(&path, true).unwrap();
        let counts = table_counts(&conn).unwrap();
        assert!(counts.contains(&("authors".to_string(), 0)));
    }
}
