//! Bundled default dataset, used when nothing has been stored yet.

use crate::record::TenderRecord;

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Fresh, owned copies of the seed tenders.
///
/// Every call parses the bundled document again, so callers can mutate the
/// result freely without affecting later calls.
pub fn seed_records() -> Vec<TenderRecord> {
    match serde_json::from_str(SEED_JSON) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!("bundled seed dataset is invalid: {err}");
            Vec::new()
        }
    }
}
