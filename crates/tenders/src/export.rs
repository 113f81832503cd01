//! CSV export of a tender collection.
//!
//! Format: an unquoted header row, then one row per tender with every field
//! double-quoted (embedded quotes doubled). Rows are separated by `\n` and the
//! document has no trailing newline. Commas and newlines inside fields stay
//! within the quotes, so the output is RFC-4180 safe.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use tenderdesk_core::Entity;

use crate::record::TenderRecord;

/// Fixed export column order.
pub const CSV_COLUMNS: [&str; 7] = ["id", "name", "status", "value", "deadline", "org", "note"];

pub const EXPORT_FILE_NAME: &str = "tenders.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv buffer error: {0}")]
    Buffer(String),
}

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub body: String,
}

/// Serialize every record (filters never apply) to CSV.
pub fn export_csv<'a>(
    records: impl IntoIterator<Item = &'a TenderRecord>,
) -> Result<ExportArtifact, ExportError> {
    let mut header = CSV_COLUMNS.join(",").into_bytes();
    header.push(b'\n');

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(header);

    let mut rows = 0usize;
    for record in records {
        // A zero value is written as an empty cell.
        let value = if record.value().is_zero() {
            String::new()
        } else {
            record.value().to_string()
        };
        wtr.write_record([
            record.id().as_str(),
            record.name(),
            record.status().as_str(),
            value.as_str(),
            record.deadline(),
            record.org(),
            record.note(),
        ])?;
        rows += 1;
    }

    let mut data = wtr
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    if rows > 0 {
        // Rows are separated, not terminated.
        data.pop();
    }

    let body = String::from_utf8(data).map_err(|e| ExportError::Buffer(e.to_string()))?;
    tracing::debug!(rows, bytes = body.len(), "exported tenders to csv");

    Ok(ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        mime_type: EXPORT_MIME_TYPE,
        body,
    })
}
