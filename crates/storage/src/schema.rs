//! Persisted layout of the tender collection.
//!
//! The blob is a JSON array of flat objects (`id, name, org, status, value,
//! deadline, note`). Writing uses the strict `TenderRecord` shape. Reading is
//! lenient: every field is optional, `null` is tolerated, scalars are accepted
//! where text is expected, and `value` may be a number or a numeric string.
//! The defaulting step below is the migration from whatever was stored to the
//! current record shape.

use serde::Deserialize;

use tenderdesk_core::TenderId;
use tenderdesk_tenders::{TenderFields, TenderRecord, TenderStatus, TenderValue};

use crate::error::StorageError;

/// A scalar stored where text is expected.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredText {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl StoredText {
    /// Returns the text and whether it had to be converted.
    fn into_text(self) -> (String, bool) {
        match self {
            StoredText::Text(s) => (s, false),
            StoredText::Number(n) => (n.to_string(), true),
            StoredText::Bool(b) => (b.to_string(), true),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Number(f64),
    Text(String),
}

/// One stored tender, as loosely as it may have been written.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredTender {
    id: Option<StoredText>,
    name: Option<StoredText>,
    org: Option<StoredText>,
    status: Option<StoredText>,
    value: Option<StoredValue>,
    deadline: Option<StoredText>,
    note: Option<StoredText>,
}

/// Result of decoding a stored blob.
#[derive(Debug)]
pub struct Decoded {
    pub records: Vec<TenderRecord>,
    /// Number of records that needed at least one field defaulted.
    pub normalized: usize,
}

/// Decode a stored blob, defaulting absent or odd fields.
///
/// Fails only when the blob is not a JSON array of objects.
pub fn decode(raw: &str) -> Result<Decoded, StorageError> {
    let stored: Vec<StoredTender> = serde_json::from_str(raw).map_err(StorageError::Malformed)?;

    let mut normalized = 0;
    let records = stored
        .into_iter()
        .map(|s| {
            let (record, changed) = migrate(s);
            if changed {
                normalized += 1;
            }
            record
        })
        .collect();

    Ok(Decoded {
        records,
        normalized,
    })
}

/// Encode the whole collection for storage.
pub fn encode(records: &[TenderRecord]) -> Result<String, StorageError> {
    serde_json::to_string(records).map_err(StorageError::Serialize)
}

fn migrate(stored: StoredTender) -> (TenderRecord, bool) {
    let mut changed = false;
    let mut text = |field: Option<StoredText>| match field {
        Some(value) => {
            let (s, converted) = value.into_text();
            changed |= converted;
            s
        }
        None => {
            changed = true;
            String::new()
        }
    };

    let raw_id = text(stored.id);
    let name = text(stored.name);
    let org = text(stored.org);
    let raw_status = text(stored.status);
    let deadline = text(stored.deadline);
    let note = text(stored.note);

    let id = match raw_id.parse::<TenderId>() {
        Ok(id) => id,
        Err(_) => {
            let id = TenderId::generate();
            tracing::warn!(%id, "stored tender had no id; assigned a fresh one");
            changed = true;
            id
        }
    };

    let status = match raw_status.parse::<TenderStatus>() {
        Ok(status) if status.as_str() == raw_status => status,
        Ok(status) => {
            changed = true;
            status
        }
        Err(_) => {
            changed = true;
            TenderStatus::Draft
        }
    };

    let value = match stored.value {
        Some(StoredValue::Number(n)) => TenderValue::new(n).unwrap_or_else(|_| {
            changed = true;
            TenderValue::ZERO
        }),
        Some(StoredValue::Text(s)) => {
            changed = true;
            TenderValue::parse_form(&s).unwrap_or(TenderValue::ZERO)
        }
        None => {
            changed = true;
            TenderValue::ZERO
        }
    };

    let record = TenderRecord::restore(
        id,
        TenderFields {
            name,
            org,
            status,
            value,
            deadline,
            note,
        },
    );
    (record, changed)
}
