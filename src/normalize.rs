//! Maps raw CSV rows onto transient entity records.
//!
//! Everything here is pure; persistence happens in [`crate::upsert`] and
//! [`crate::link`].

use crate::config::{columns, LIST_SEPARATORS, MANUAL_LABEL_TYPE};
use crate::models::{
    ArticleRecord, AuthorEntry, KeywordEntry, KeywordType, LabelRecord, PublicationRecord,
};
use crate::reader::RawRow;
use rustc_hash::FxHashMap;

/// Occurrence counts of author names within one article's author list.
pub type NameCounts = FxHashMap<String, u32>;

/// Splits a list-valued cell on `;` or `|`, trimming entries and dropping empties.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a trimmed integer cell, `None` when blank or not a number.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Suffixes repeated names so each entry is unique within the list.
///
/// The second occurrence of a name becomes `"<name> (2)"`, the third
/// `"<name> (3)"` and so on. `seen` must be fresh for every article. Returns
/// the disambiguated list and the names that repeated, in first-seen order.
pub fn disambiguate_authors(
    names: Vec<String>,
    seen: &mut NameCounts,
) -> (Vec<String>, Vec<String>) {
    let mut duplicates = Vec::new();
    let names = names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            match *count {
                1 => name,
                n => {
                    if n == 2 {
                        duplicates.push(name.clone());
                    }
                    format!("{} ({})", name, n)
                }
            }
        })
        .collect();
    (names, duplicates)
}

/// Authors of a document row paired positionally with their affiliations.
///
/// Blank author slots are skipped but still hold their position, so later
/// authors keep their own affiliation. Also returns the raw names that
/// repeated within the row.
pub fn author_entries(row: &RawRow) -> (Vec<AuthorEntry>, Vec<String>) {
    let (slots, raw_names): (Vec<usize>, Vec<String>) = row
        .get(columns::AUTHORS)
        .split(LIST_SEPARATORS)
        .map(str::trim)
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(slot, name)| (slot, name.to_string()))
        .unzip();

    let mut seen = NameCounts::default();
    let (names, duplicates) = disambiguate_authors(raw_names, &mut seen);

    let affiliations: Vec<&str> = row
        .get(columns::AFFILIATIONS)
        .split(LIST_SEPARATORS)
        .map(str::trim)
        .collect();

    let entries = names
        .into_iter()
        .zip(slots)
        .map(|(name, slot)| AuthorEntry {
            name,
            affiliation: affiliations
                .get(slot)
                .filter(|a| !a.is_empty())
                .map(|a| a.to_string()),
        })
        .collect();

    (entries, duplicates)
}

/// Every keyword of a document row tagged with its vocabulary.
///
/// Repeats are preserved so the linker sees each occurrence.
pub fn keyword_entries(row: &RawRow) -> Vec<KeywordEntry> {
    KeywordType::ALL
        .iter()
        .flat_map(|&kind| {
            split_list(row.get(kind.column()))
                .into_iter()
                .map(move |term| KeywordEntry { term, kind })
        })
        .collect()
}

pub fn publication_record(row: &RawRow) -> PublicationRecord {
    PublicationRecord {
        title: row.get(columns::PUBLICATION_TITLE).trim().to_string(),
        publisher: row.get(columns::PUBLISHER).trim().to_string(),
        meeting_date: row.get(columns::MEETING_DATE).trim().to_string(),
    }
}

pub fn article_record(row: &RawRow) -> ArticleRecord {
    let text = |col: &str| row.get(col).trim().to_string();
    let int = |col: &str| parse_int(row.get(col));

    ArticleRecord {
        title: text(columns::TITLE),
        abstract_text: text(columns::ABSTRACT),
        xplore_date: text(columns::XPLORE_DATE),
        pub_year: int(columns::PUB_YEAR),
        volume: int(columns::VOLUME),
        issue: text(columns::ISSUE),
        start_page: int(columns::START_PAGE),
        end_page: int(columns::END_PAGE),
        issn: text(columns::ISSN),
        isbn: text(columns::ISBNS),
        doi: text(columns::DOI),
        funding_info: text(columns::FUNDING),
        pdf_link: text(columns::PDF_LINK),
        citation_count: int(columns::CITATION_COUNT),
        reference_count: int(columns::REFERENCE_COUNT),
        copyright_year: int(columns::COPYRIGHT_YEAR),
        license: text(columns::LICENSE),
        online_date: text(columns::ONLINE_DATE),
        document_identifier: text(columns::DOCUMENT_IDENTIFIER),
    }
}

pub fn label_record(row: &RawRow) -> LabelRecord {
    LabelRecord {
        title: row.get(columns::TITLE).trim().to_string(),
        pub_year: parse_int(row.get(columns::PUB_YEAR)),
        raw_year: row.get(columns::PUB_YEAR).trim().to_string(),
        name: row.get(columns::DOMAIN).trim().to_string(),
        kind: MANUAL_LABEL_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CsvSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn single_row(header: &str, record: &str) -> RawRow {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", header).unwrap();
        writeln!(tmp, "{}", record).unwrap();
        tmp.flush().unwrap();
        CsvSource::open(tmp.path(), &[]).unwrap().next().unwrap().unwrap()
    }

    #[test]
    fn split_list_handles_both_separators() {
        assert_eq!(
            split_list(" Y. Liu; J. Smith |A. Chen ;; "),
            names(&["Y. Liu", "J. Smith", "A. Chen"])
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn parse_int_blank_and_garbage() {
        assert_eq!(parse_int(" 2018 "), Some(2018));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("12a"), None);
    }

    #[test]
    fn repeated_author_gets_positional_suffix() {
        let mut seen = NameCounts::default();
        let (out, dups) =
            disambiguate_authors(names(&["Y. Liu", "J. Smith", "Y. Liu"]), &mut seen);
        assert_eq!(out, names(&["Y. Liu", "J. Smith", "Y. Liu (2)"]));
        assert_eq!(dups, names(&["Y. Liu"]));
    }

    #[test]
    fn third_occurrence_counts_up() {
        let mut seen = NameCounts::default();
        let (out, dups) = disambiguate_authors(names(&["A", "A", "B", "A", "B"]), &mut seen);
        assert_eq!(out, names(&["A", "A (2)", "B", "A (3)", "B (2)"]));
        assert_eq!(dups, names(&["A", "B"]));
    }

    #[test]
    fn unique_authors_untouched() {
        let mut seen = NameCounts::default();
        let (out, dups) = disambiguate_authors(names(&["A", "B"]), &mut seen);
        assert_eq!(out, names(&["A", "B"]));
        assert!(dups.is_empty());
    }

    #[test]
    fn authors_pair_with_affiliations_by_position() {
        let row = single_row(
            "Authors,Author Affiliations",
            "\"Y. Liu; J. Smith; Y. Liu\",\"MIT; ; Tsinghua\"",
        );
        let (entries, dups) = author_entries(&row);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].affiliation.as_deref(), Some("MIT"));
        assert_eq!(entries[1].affiliation, None);
        assert_eq!(entries[2].name, "Y. Liu (2)");
        assert_eq!(entries[2].affiliation.as_deref(), Some("Tsinghua"));
        assert_eq!(dups, names(&["Y. Liu"]));
    }

    #[test]
    fn blank_author_slot_keeps_affiliations_aligned() {
        let row = single_row(
            "Authors,Author Affiliations",
            "\"A;  ; B\",\"X; Y; Z\"",
        );
        let (entries, dups) = author_entries(&row);
        let pairs: Vec<(&str, Option<&str>)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.affiliation.as_deref()))
            .collect();
        assert_eq!(pairs, vec![("A", Some("X")), ("B", Some("Z"))]);
        assert!(dups.is_empty());
    }

    #[test]
    fn keywords_tagged_and_repeats_kept() {
        let row = single_row(
            "Author Keywords,IEEE Terms,Mesh_Terms",
            "\"ZigBee;ZigBee\",Smart grids,",
        );
        let entries = keyword_entries(&row);
        let pairs: Vec<(&str, KeywordType)> =
            entries.iter().map(|e| (e.term.as_str(), e.kind)).collect();
        assert_eq!(
            pairs,
            vec![
                ("ZigBee", KeywordType::Author),
                ("ZigBee", KeywordType::Author),
                ("Smart grids", KeywordType::Ieee),
            ]
        );
    }

    #[test]
    fn article_record_parses_integers() {
        let row = single_row(
            "Document Title,Publication_Year,Volume,Start Page,ISSN",
            " Grid Sensing ,2018,n/a,12, 1949-3053 ",
        );
        let article = article_record(&row);
        assert_eq!(article.title, "Grid Sensing");
        assert_eq!(article.pub_year, Some(2018));
        assert_eq!(article.volume, None);
        assert_eq!(article.start_page, Some(12));
        assert_eq!(article.issn, "1949-3053");
    }

    #[test]
    fn label_record_uses_manual_type() {
        let row = single_row(
            "Publication_Year,Document Title,Domain",
            "2017, Grid Sensing ,Microgrids ",
        );
        let label = label_record(&row);
        assert_eq!(label.title, "Grid Sensing");
        assert_eq!(label.pub_year, Some(2017));
        assert_eq!(label.name, "Microgrids");
        assert_eq!(label.kind, MANUAL_LABEL_TYPE);
    }
}
