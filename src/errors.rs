//! Error taxonomy for a wrangling run.
//!
//! [`FileError`] is fatal and aborts the run during setup. [`WrangleError`]
//! describes a single bad row or relationship; it is recorded in the
//! [`ErrorCollector`] and processing continues.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is missing expected columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
    #[error("malformed CSV in {} at line {line}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateKeyword,
    LabelLookupFailed,
    NonuniqueAuthorName,
    LabelAssignFailed,
    ArticleInsertFailed,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::DuplicateKeyword,
        ErrorKind::LabelLookupFailed,
        ErrorKind::NonuniqueAuthorName,
        ErrorKind::LabelAssignFailed,
        ErrorKind::ArticleInsertFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateKeyword => "duplicate_keyword",
            ErrorKind::LabelLookupFailed => "label_lookup_failed",
            ErrorKind::NonuniqueAuthorName => "nonunique_author_name",
            ErrorKind::LabelAssignFailed => "label_assign_failed",
            ErrorKind::ArticleInsertFailed => "article_insert_failed",
        }
    }

    /// Operator-facing wording used in logs.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateKeyword => "duplicate keywords",
            ErrorKind::LabelLookupFailed => "could not lookup article for label",
            ErrorKind::NonuniqueAuthorName => "non-unique author names for article",
            ErrorKind::LabelAssignFailed => "could not assign label to article",
            ErrorKind::ArticleInsertFailed => "could not insert article",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal anomaly met while wrangling one row.
///
/// Serializes as `{"kind": "...", "detail": {...}}`; field order in each
/// detail follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum WrangleError {
    DuplicateKeyword {
        title: String,
        pub_year: String,
        article_id: i64,
        term: String,
        term_type: String,
        occurrence: u32,
    },
    LabelLookupFailed {
        title: String,
        pub_year: String,
        label: String,
    },
    NonuniqueAuthorName {
        title: String,
        pub_year: String,
        article_id: i64,
        duplicates: Vec<String>,
    },
    LabelAssignFailed {
        title: String,
        pub_year: String,
        label: String,
        article_id: i64,
        label_id: Option<i64>,
    },
    ArticleInsertFailed {
        title: String,
        pub_year: String,
        reason: String,
    },
}

impl WrangleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WrangleError::DuplicateKeyword { .. } => ErrorKind::DuplicateKeyword,
            WrangleError::LabelLookupFailed { .. } => ErrorKind::LabelLookupFailed,
            WrangleError::NonuniqueAuthorName { .. } => ErrorKind::NonuniqueAuthorName,
            WrangleError::LabelAssignFailed { .. } => ErrorKind::LabelAssignFailed,
            WrangleError::ArticleInsertFailed { .. } => ErrorKind::ArticleInsertFailed,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WrangleError::DuplicateKeyword { title, .. }
            | WrangleError::LabelLookupFailed { title, .. }
            | WrangleError::NonuniqueAuthorName { title, .. }
            | WrangleError::LabelAssignFailed { title, .. }
            | WrangleError::ArticleInsertFailed { title, .. } => title,
        }
    }
}

/// Append-only, ordered record of wrangling errors.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<WrangleError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: WrangleError) {
        warn!(kind = %error.kind(), title = error.title(), "{}", error.kind().message());
        self.errors.push(error);
    }

    pub fn into_errors(self) -> Vec<WrangleError> {
        self.errors
    }
}
