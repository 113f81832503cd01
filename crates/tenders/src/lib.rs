//! Tender domain module.
//!
//! This crate contains the tender record model and the pure operations over a
//! collection of tenders (query, stats, CSV export), implemented as
//! deterministic domain logic (no IO, no storage).

pub mod export;
pub mod query;
pub mod record;
pub mod seed;
pub mod stats;

pub use export::{CSV_COLUMNS, ExportArtifact, ExportError, export_csv};
pub use query::{StatusFilter, TenderQuery};
pub use record::{CLONE_MARKER, TenderFields, TenderRecord, TenderStatus, TenderValue};
pub use seed::seed_records;
pub use stats::TenderStats;
