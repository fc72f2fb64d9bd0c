//! Export - downloadable encodings of history entries
//!
//! CSV cells are quoted only when they contain a comma, a double quote or a
//! line break; quotes inside a quoted cell are doubled. The same rule and
//! the same columns apply to single-entry and full-history exports.

use crate::entry::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// CSV header, in column order
pub const CSV_COLUMNS: [&str; 7] = [
    "timestamp",
    "description",
    "countryOfOrigin",
    "declaredValue",
    "htsCode",
    "dutyRate",
    "rationale",
];

/// Export encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl ExportFormat {
    /// File extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// MIME type for downloads
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Quote a cell if it contains a comma, quote or line break
#[must_use]
pub fn csv_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn csv_line<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|c| csv_cell(c.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_record(entry: &HistoryEntry) -> [String; 7] {
    [
        entry.iso_timestamp(),
        entry.request.product_description.clone(),
        entry.request.country_of_origin.clone().unwrap_or_default(),
        entry
            .request
            .declared_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
        entry.response.hts_code.clone(),
        entry.response.duty_rate.clone(),
        entry.response.rationale.clone(),
    ]
}

/// Render entries as a CSV table (header + one row per entry)
#[must_use]
pub fn to_csv<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let mut out = csv_line(CSV_COLUMNS);
    out.push('\n');
    for entry in entries {
        out.push_str(&csv_line(csv_record(entry)));
        out.push('\n');
    }
    out
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    serde_json::to_vec_pretty(value).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to encode export as JSON");
        Vec::new()
    })
}

/// Encode a single entry
#[must_use]
pub fn export_entry(entry: &HistoryEntry, format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::Json => to_pretty_json(entry),
        ExportFormat::Csv => to_csv(std::iter::once(entry)).into_bytes(),
    }
}

/// Encode a sequence of entries (newest first)
#[must_use]
pub fn export_entries(entries: &[HistoryEntry], format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::Json => to_pretty_json(entries),
        ExportFormat::Csv => to_csv(entries).into_bytes(),
    }
}

/// Suggested download file name
///
/// `tslite-<timestamp>.<ext>` for a single entry, `tslite-history.<ext>`
/// for the full log.
#[must_use]
pub fn export_filename(entry: Option<&HistoryEntry>, format: ExportFormat) -> String {
    match entry {
        Some(entry) => format!("tslite-{}.{}", entry.timestamp, format.extension()),
        None => format!("tslite-history.{}", format.extension()),
    }
}
