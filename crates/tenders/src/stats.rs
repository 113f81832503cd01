use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{TenderRecord, TenderStatus};

/// Counts over a tender collection: the total plus one count per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenderStats {
    total: usize,
    by_status: BTreeMap<TenderStatus, usize>,
}

impl TenderStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TenderRecord>) -> Self {
        let mut by_status: BTreeMap<TenderStatus, usize> =
            TenderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total = 0;
        for record in records {
            total += 1;
            *by_status.entry(record.status()).or_default() += 1;
        }
        Self { total, by_status }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, status: TenderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn submitted(&self) -> usize {
        self.count(TenderStatus::Submitted)
    }

    pub fn pending(&self) -> usize {
        self.count(TenderStatus::Pending)
    }

    pub fn awarded(&self) -> usize {
        self.count(TenderStatus::Awarded)
    }

    /// `(status, count)` pairs for every status, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TenderStatus, usize)> + '_ {
        self.by_status.iter().map(|(s, n)| (*s, *n))
    }
}
