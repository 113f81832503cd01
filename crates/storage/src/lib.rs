//! `tenderdesk-storage`
//!
//! **Responsibility:** the tender record store and the blob storage it persists to.
//!
//! This crate provides:
//! - `BlobStore`: a key/value store holding whole serialized values
//!   (in-memory for tests/dev, one-file-per-key on disk)
//! - the persisted schema, read leniently and defaulted at load time
//! - `RecordStore`: the owned, in-memory tender collection with
//!   query/mutate/aggregate/export operations, persisted after every mutation

pub mod blob;
pub mod error;
pub mod schema;
pub mod store;

pub use blob::{BlobStore, FileBlobStore, InMemoryBlobStore};
pub use error::StorageError;
pub use store::{DEFAULT_STORAGE_KEY, LoadOutcome, RecordStore, SeedReason};
