use crate::errors::FileError;
use csv::{Reader, StringRecord, StringRecordsIntoIter};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const BOM: char = '\u{feff}';

/// One input row, addressed by column name.
#[derive(Debug, Clone)]
pub struct RawRow {
    columns: Arc<FxHashMap<String, usize>>,
    record: StringRecord,
    line: u64,
}

impl RawRow {
    /// Raw cell for `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .get(column)
            .and_then(|&idx| self.record.get(idx))
            .unwrap_or("")
    }

    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Streams rows of one CSV export in source order.
///
/// Finite and single-pass: reopen the file to read it again.
pub struct CsvSource {
    path: PathBuf,
    columns: Arc<FxHashMap<String, usize>>,
    records: StringRecordsIntoIter<BufReader<File>>,
}

impl CsvSource {
    /// Opens `path` and checks its header against `schema`.
    pub fn open(path: impl AsRef<Path>, schema: &[&str]) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| FileError::Open {
            path: path.clone(),
            source,
        })?;

        let mut reader = Reader::from_reader(BufReader::with_capacity(128 * 1024, file));
        let headers = reader
            .headers()
            .map_err(|source| FileError::Malformed {
                path: path.clone(),
                line: 1,
                source,
            })?
            .clone();

        let columns: FxHashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches(BOM).trim().to_string(), idx))
            .collect();

        let missing: Vec<String> = schema
            .iter()
            .filter(|col| !columns.contains_key(**col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FileError::MissingColumns { path, missing });
        }

        debug!(path = %path.display(), columns = columns.len(), "Opened CSV source");

        Ok(Self {
            path,
            columns: Arc::new(columns),
            records: reader.into_records(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for CsvSource {
    type Item = Result<RawRow, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.records.next()?;
        Some(match result {
            Ok(record) => Ok(RawRow {
                columns: Arc::clone(&self.columns),
                line: record.position().map_or(0, |p| p.line()),
                record,
            }),
            Err(source) => Err(FileError::Malformed {
                path: self.path.clone(),
                line: source.position().map_or(0, |p| p.line()),
                source,
            }),
        })
    }
}
