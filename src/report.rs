use crate::errors::{ErrorKind, WrangleError};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: ErrorKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Most frequent kind first; ties keep [`ErrorKind`] order.
    pub counts: Vec<KindCount>,
    pub total: usize,
}

impl Summary {
    pub fn tally(errors: &[WrangleError]) -> Self {
        let mut by_kind: FxHashMap<ErrorKind, usize> = FxHashMap::default();
        for error in errors {
            *by_kind.entry(error.kind()).or_insert(0) += 1;
        }

        let mut counts: Vec<KindCount> = by_kind
            .into_iter()
            .map(|(kind, count)| KindCount { kind, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.kind.cmp(&b.kind)));

        Self {
            counts,
            total: errors.len(),
        }
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.counts
            .iter()
            .find(|c| c.kind == kind)
            .map_or(0, |c| c.count)
    }
}

/// Everything recorded during a run, as saved to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub errors: Vec<WrangleError>,
    pub summary: Summary,
}

impl Report {
    pub fn from_errors(errors: Vec<WrangleError>) -> Self {
        let summary = Summary::tally(&errors);
        Self { errors, summary }
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to serialize report")?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the JSON report to `path`, or to stdout when `None`.
    pub fn write_json(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory: {}", parent.display())
                    })?;
                }
                let file = File::create(path)
                    .with_context(|| format!("Failed to create report: {}", path.display()))?;
                self.to_writer(file)
            }
            None => self.to_writer(io::stdout().lock()),
        }
    }

    /// Error tally as a pipe table with a trailing total.
    pub fn summary_table(&self) -> String {
        let mut rows: Vec<(String, String)> = self
            .summary
            .counts
            .iter()
            .map(|c| (c.kind.to_string(), c.count.to_string()))
            .collect();
        rows.push(("Total".to_string(), self.summary.total.to_string()));
        pipe_table(("Error", "Count"), &rows)
    }
}

pub fn load_report(path: &Path) -> Result<Report> {
    let file =
        File::open(path).with_context(|| format!("Failed to open report: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse report: {}", path.display()))
}

/// Renders a two-column markdown pipe table, right-aligning the second column.
pub fn pipe_table(headers: (&str, &str), rows: &[(String, String)]) -> String {
    let left = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .chain([headers.0.len()])
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .map(|(_, r)| r.chars().count())
        .chain([headers.1.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("| {:<left$} | {:>right$} |\n", headers.0, headers.1));
    out.push_str(&format!(
        "|:{}|{}:|\n",
        "-".repeat(left + 1),
        "-".repeat(right + 1)
    ));
    for (l, r) in rows {
        out.push_str(&format!("| {:<left$} | {:>right$} |\n", l, r));
    }
    out
}
