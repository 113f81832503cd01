//! Filtering and free-text search over tenders.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tenderdesk_core::DomainError;

use crate::record::{TenderRecord, TenderStatus};

/// Status filter: everything, or a single status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TenderStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TenderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<TenderStatus> for StatusFilter {
    fn from(status: TenderStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    /// `All` (any case) or a status label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<TenderStatus>().map(StatusFilter::Only)
    }
}

impl core::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => core::fmt::Display::fmt(status, f),
        }
    }
}

/// A list query: search text plus a status filter.
///
/// The text is trimmed and lower-cased once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderQuery {
    text: String,
    status: StatusFilter,
}

impl TenderQuery {
    pub fn new(text: &str, status: StatusFilter) -> Self {
        Self {
            text: text.trim().to_lowercase(),
            status,
        }
    }

    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn matches(&self, record: &TenderRecord) -> bool {
        self.status.matches(record.status())
            && (self.text.is_empty() || record.search_text().contains(&self.text))
    }
}
