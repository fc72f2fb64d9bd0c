//! Terminal rendering of results, entries and errors

use tslite_client::{ClassificationResult, Error};
use tslite_history::HistoryEntry;

const EMPTY: &str = "-";
const DESCRIPTION_WIDTH: usize = 48;

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY
    } else {
        value
    }
}

/// Human-readable result block
pub fn result_text(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let rows = [
        ("HTS code", result.hts_code.as_str()),
        ("Product", result.product.as_str()),
        ("Duty rate", result.duty_rate.as_str()),
        ("VAT", result.vat.as_str()),
        ("Trade agreement", result.trade_agreement.as_str()),
        ("Rationale", result.rationale.as_str()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{:<16} {}\n", format!("{label}:"), or_dash(value)));
    }

    if !result.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for warning in &result.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    if !result.items.is_empty() {
        out.push_str("Details:\n");
        for item in &result.items {
            out.push_str(&format!("  {}: {}\n", or_dash(&item.label), or_dash(&item.value)));
        }
    }

    out
}

/// One line of `history list`
pub fn entry_line(position: usize, entry: &HistoryEntry) -> String {
    let when = entry
        .recorded_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.timestamp.to_string());

    format!(
        "{:>3}  {}  {:<12}  {}",
        position,
        when,
        or_dash(&entry.response.hts_code),
        truncate(&entry.request.product_description, DESCRIPTION_WIDTH)
    )
}

/// Request summary printed above a shown entry
pub fn request_text(entry: &HistoryEntry) -> String {
    let request = &entry.request;
    let mut out = format!("{:<16} {}\n", "Recorded:", entry.iso_timestamp());
    out.push_str(&format!("{:<16} {}\n", "Description:", request.product_description));
    if let Some(country) = &request.country_of_origin {
        out.push_str(&format!("{:<16} {}\n", "Origin:", country));
    }
    if let Some(value) = request.declared_value {
        out.push_str(&format!("{:<16} {}\n", "Declared value:", value));
    }
    out
}

/// Message shown to the user for a failed classification
///
/// Timeouts carry a retry hint; service errors carry the service's detail.
pub fn error_message(error: &Error) -> String {
    match error {
        Error::Validation(reason) => format!("Invalid request: {reason}."),
        Error::Timeout(ms) => format!(
            "The classification service did not answer within {:.1}s. It may be starting up; try again shortly.",
            *ms as f64 / 1000.0
        ),
        Error::Service { status, detail } => {
            format!("Classification failed (HTTP {status}): {detail}")
        }
        Error::Protocol(reason) => {
            format!("The classification service sent an unreadable answer: {reason}")
        }
        Error::Network(reason) => {
            format!("Could not reach the classification service: {reason}")
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}
