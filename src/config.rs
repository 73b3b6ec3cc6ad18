/// Default document metadata export
pub const DEFAULT_DOCS_PATH: &str = "data/lit-review-doc-metadata.csv";

/// Default taxonomic categories export
pub const DEFAULT_CATS_PATH: &str = "data/lit-review-categories.csv";

/// Default SQLite output
pub const DEFAULT_DB_PATH: &str = "data/biblio.db";

/// Default location of the saved error report
pub const DEFAULT_REPORT_PATH: &str = "data/wrangle_report.json";

/// Label type assigned to every row of the categories export
pub const MANUAL_LABEL_TYPE: &str = "sgsma_manual";

/// Progress update interval (tick every N rows)
pub const PROGRESS_INTERVAL: u64 = 100;

/// Separators accepted between entries of a list-valued cell
pub const LIST_SEPARATORS: &[char] = &[';', '|'];

pub mod columns {
    pub const TITLE: &str = "Document Title";
    pub const AUTHORS: &str = "Authors";
    pub const AFFILIATIONS: &str = "Author Affiliations";
    pub const PUBLICATION_TITLE: &str = "Publication Title";
    pub const XPLORE_DATE: &str = "Date Added To Xplore";
    pub const PUB_YEAR: &str = "Publication_Year";
    pub const VOLUME: &str = "Volume";
    pub const ISSUE: &str = "Issue";
    pub const START_PAGE: &str = "Start Page";
    pub const END_PAGE: &str = "End Page";
    pub const ABSTRACT: &str = "Abstract";
    pub const ISSN: &str = "ISSN";
    pub const ISBNS: &str = "ISBNs";
    pub const DOI: &str = "DOI";
    pub const FUNDING: &str = "Funding Information";
    pub const PDF_LINK: &str = "PDF Link";
    pub const AUTHOR_KEYWORDS: &str = "Author Keywords";
    pub const IEEE_TERMS: &str = "IEEE Terms";
    pub const INSPEC_CONTROLLED: &str = "INSPEC Controlled Terms";
    pub const INSPEC_NON_CONTROLLED: &str = "INSPEC Non-Controlled Terms";
    pub const MESH_TERMS: &str = "Mesh_Terms";
    pub const CITATION_COUNT: &str = "Article Citation Count";
    pub const REFERENCE_COUNT: &str = "Reference Count";
    pub const COPYRIGHT_YEAR: &str = "Copyright Year";
    pub const LICENSE: &str = "License";
    pub const ONLINE_DATE: &str = "Online Date";
    pub const MEETING_DATE: &str = "Meeting Date";
    pub const PUBLISHER: &str = "Publisher";
    pub const DOCUMENT_IDENTIFIER: &str = "Document Identifier";
    pub const DOMAIN: &str = "Domain";
}

/// Columns the document metadata export must carry
pub const DOC_COLUMNS: &[&str] = &[
    columns::TITLE,
    columns::AUTHORS,
    columns::AFFILIATIONS,
    columns::PUBLICATION_TITLE,
    columns::XPLORE_DATE,
    columns::PUB_YEAR,
    columns::VOLUME,
    columns::ISSUE,
    columns::START_PAGE,
    columns::END_PAGE,
    columns::ABSTRACT,
    columns::ISSN,
    columns::ISBNS,
    columns::DOI,
    columns::FUNDING,
    columns::PDF_LINK,
    columns::AUTHOR_KEYWORDS,
    columns::IEEE_TERMS,
    columns::INSPEC_CONTROLLED,
    columns::INSPEC_NON_CONTROLLED,
    columns::MESH_TERMS,
    columns::CITATION_COUNT,
    columns::REFERENCE_COUNT,
    columns::COPYRIGHT_YEAR,
    columns::LICENSE,
    columns::ONLINE_DATE,
    columns::MEETING_DATE,
    columns::PUBLISHER,
    columns::DOCUMENT_IDENTIFIER,
];

/// Columns the categories export must carry
pub const CATEGORY_COLUMNS: &[&str] = &[columns::PUB_YEAR, columns::TITLE, columns::DOMAIN];
