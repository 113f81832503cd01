use std::path::PathBuf;

use thiserror::Error;

/// Failures of the blob storage layer.
///
/// None of these are fatal to a running session: load treats them as "no
/// data" and mutations keep the in-memory collection authoritative.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize tenders: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("malformed persisted data: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("storage quota exceeded for key {key:?}: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    Poisoned,

    /// The last load could not read the stored collection, so writing now
    /// could overwrite data that was never seen.
    #[error("refusing to overwrite {key:?}: stored tenders could not be read")]
    UnreadSource { key: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
