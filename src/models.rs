use std::fmt;

/// Vocabulary a keyword was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordType {
    Author,
    Ieee,
    InspecControlled,
    InspecNonControlled,
    Mesh,
}

impl KeywordType {
    pub const ALL: [KeywordType; 5] = [
        KeywordType::Author,
        KeywordType::Ieee,
        KeywordType::InspecControlled,
        KeywordType::InspecNonControlled,
        KeywordType::Mesh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordType::Author => "author",
            KeywordType::Ieee => "ieee",
            KeywordType::InspecControlled => "inspec_controlled",
            KeywordType::InspecNonControlled => "inspec_non_controlled",
            KeywordType::Mesh => "mesh",
        }
    }

    /// Source column holding this vocabulary in the document export
    pub fn column(&self) -> &'static str {
        use crate::config::columns;
        match self {
            KeywordType::Author => columns::AUTHOR_KEYWORDS,
            KeywordType::Ieee => columns::IEEE_TERMS,
            KeywordType::InspecControlled => columns::INSPEC_CONTROLLED,
            KeywordType::InspecNonControlled => columns::INSPEC_NON_CONTROLLED,
            KeywordType::Mesh => columns::MESH_TERMS,
        }
    }
}

impl fmt::Display for KeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationRecord {
    pub title: String,
    pub publisher: String,
    pub meeting_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleRecord {
    pub title: String,
    pub abstract_text: String,
    pub xplore_date: String,
    pub pub_year: Option<i64>,
    pub volume: Option<i64>,
    pub issue: String,
    pub start_page: Option<i64>,
    pub end_page: Option<i64>,
    pub issn: String,
    pub isbn: String,
    pub doi: String,
    pub funding_info: String,
    pub pdf_link: String,
    pub citation_count: Option<i64>,
    pub reference_count: Option<i64>,
    pub copyright_year: Option<i64>,
    pub license: String,
    pub online_date: String,
    pub document_identifier: String,
}

/// One author of an article after name disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub name: String,
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub term: String,
    pub kind: KeywordType,
}

/// A label assignment read from the categories export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    pub title: String,
    pub pub_year: Option<i64>,
    pub raw_year: String,
    pub name: String,
    pub kind: String,
}
