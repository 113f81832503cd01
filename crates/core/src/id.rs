//! Strongly-typed tender identifiers.

use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Prefix carried by every generated tender identifier.
pub const TENDER_ID_PREFIX: &str = "CP";

/// Number of random characters after the prefix.
pub const TENDER_ID_SUFFIX_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Identifier of a tender record.
///
/// Generated identifiers look like `CP7K2QXA`. Identifiers read back from
/// storage may have any non-empty shape; uniqueness is assumed, not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderId(String);

impl TenderId {
    /// Generate a fresh random identifier using the thread-local RNG.
    ///
    /// No collision check is performed.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate an identifier from an explicit RNG (seeded RNGs give
    /// deterministic ids in tests).
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut id = String::with_capacity(TENDER_ID_PREFIX.len() + TENDER_ID_SUFFIX_LEN);
        id.push_str(TENDER_ID_PREFIX);
        for _ in 0..TENDER_ID_SUFFIX_LEN {
            id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for TenderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("TenderId: must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}
