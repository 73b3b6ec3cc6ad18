//! bibwrangle: bibliographic CSV to SQLite wrangling
//!
//! Converts literature-review exports (document metadata plus a manual
//! categorization) into a normalized relational database for downstream
//! topic modeling:
//!
//! 1. **Read** -- Stream rows from each CSV export, checking the header up front
//! 2. **Normalize** -- Derive publication, article, author, affiliation, keyword
//!    and label records; suffix repeated author names within one article
//! 3. **Upsert** -- Insert-or-fetch every entity against its unique key
//! 4. **Link** -- Fill the author/article, author/affiliation, article/keyword
//!    and article/label association tables
//! 5. **Report** -- Collect non-fatal wrangling errors and emit them as JSON
//!    with a per-kind tally
//!
//! A run is best-effort: bad rows are recorded and skipped, and only setup
//! failures (unreadable inputs, unopenable database) abort it. Re-running over
//! the same inputs adds no rows.
//!
//! # Key Modules
//!
//! - [`reader`] -- Header-checked CSV row streaming
//! - [`normalize`] -- Pure row-to-record mapping and author disambiguation
//! - [`upsert`] -- Insert-or-fetch and savepointed article insertion
//! - [`link`] -- Association rows with duplicate detection
//! - [`errors`] -- Fatal file errors and the non-fatal wrangling error log
//! - [`report`] -- JSON report and summary tables
//! - [`wrangle`] -- Run orchestration
//! - [`db`] -- Connection setup and schema
//! - [`stats`] -- Run counters
//! - [`models`] -- Transient entity records
//! - [`config`] -- Defaults and column names
//!
//! # Example Usage
//!
//! ```bash
//! bibwrangle wrangle -d data/docs.csv -c data/cats.csv -o data/biblio.db -r data/wrangle_report.json
//! bibwrangle summarize -d data/biblio.db -r data/wrangle_report.json
//! ```

pub mod config;
pub mod db;
pub mod errors;
pub mod link;
pub mod models;
pub mod normalize;
pub mod reader;
pub mod report;
pub mod stats;
pub mod upsert;
pub mod wrangle;
