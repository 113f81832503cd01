//! The tender record store.

use tenderdesk_core::{DomainError, DomainResult, Entity, TenderId};
use tenderdesk_tenders::{
    ExportArtifact, ExportError, TenderFields, TenderQuery, TenderRecord, TenderStats, export_csv,
    seed_records,
};

use crate::blob::BlobStore;
use crate::error::StorageError;
use crate::schema;

/// Storage key of the tender collection. The suffix versions the layout.
pub const DEFAULT_STORAGE_KEY: &str = "cyber_tenders_v1";

/// Why the seed dataset was used instead of stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReason {
    /// Nothing stored under the key.
    Absent,
    /// Something was stored but could not be decoded.
    Malformed,
    /// The blob store could not be read.
    Unreadable,
}

/// What `load` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored { count: usize, normalized: usize },
    Seeded { count: usize, reason: SeedReason },
}

/// Owned, in-memory tender collection persisted to a blob store.
///
/// Newest tenders come first: adds and clones prepend. Every mutation writes
/// the whole collection back under one key. Persist failures are logged and
/// kept in `last_persist_error`; they never fail the mutation, the in-memory
/// collection stays authoritative for the session.
#[derive(Debug)]
pub struct RecordStore<B> {
    blob: B,
    key: String,
    records: Vec<TenderRecord>,
    last_persist_error: Option<StorageError>,
    read_error: Option<StorageError>,
}

impl<B: BlobStore> RecordStore<B> {
    /// Create an empty, not-yet-loaded store under the default key.
    pub fn new(blob: B) -> Self {
        Self::with_key(blob, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(blob: B, key: impl Into<String>) -> Self {
        Self {
            blob,
            key: key.into(),
            records: Vec::new(),
            last_persist_error: None,
            read_error: None,
        }
    }

    /// Create a store and load it.
    pub fn open(blob: B) -> Self {
        let mut store = Self::new(blob);
        store.load();
        store
    }

    pub fn open_with_key(blob: B, key: impl Into<String>) -> Self {
        let mut store = Self::with_key(blob, key);
        store.load();
        store
    }

    /// Replace the in-memory collection with the stored one.
    ///
    /// Absent or malformed data falls back to a fresh copy of the seed
    /// dataset, which is persisted right away. Stored data that needed
    /// defaulting is written back in normalized form.
    ///
    /// If the blob store cannot be read at all, the seed is used in memory only
    /// and every write is refused until a later `load` reads successfully; see
    /// `read_error`. Never fails.
    pub fn load(&mut self) -> LoadOutcome {
        self.read_error = None;
        let reason = match self.blob.get(&self.key) {
            Ok(Some(raw)) => match schema::decode(&raw) {
                Ok(decoded) => {
                    let count = decoded.records.len();
                    let normalized = decoded.normalized;
                    self.records = decoded.records;
                    tracing::info!(key = %self.key, count, normalized, "restored tenders");
                    if normalized > 0 {
                        self.commit();
                    }
                    return LoadOutcome::Restored { count, normalized };
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, "ignoring stored tenders: {err}");
                    SeedReason::Malformed
                }
            },
            Ok(None) => SeedReason::Absent,
            Err(err) => {
                tracing::warn!(key = %self.key, "could not read stored tenders: {err}");
                self.read_error = Some(err);
                SeedReason::Unreadable
            }
        };

        self.records = seed_records();
        let count = self.records.len();
        tracing::info!(key = %self.key, count, ?reason, "seeded tenders");
        self.commit();
        LoadOutcome::Seeded { count, reason }
    }

    /// Write the whole collection under the storage key.
    ///
    /// Refused with `UnreadSource` while `read_error` is set.
    pub fn persist(&self) -> Result<(), StorageError> {
        if self.read_error.is_some() {
            return Err(StorageError::UnreadSource {
                key: self.key.clone(),
            });
        }
        let payload = schema::encode(&self.records)?;
        self.blob.set(&self.key, &payload)
    }

    /// Persist, logging and remembering a failure instead of returning it.
    fn commit(&mut self) {
        match self.persist() {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                tracing::warn!(key = %self.key, "failed to persist tenders: {err}");
                self.last_persist_error = Some(err);
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blob(&self) -> &B {
        &self.blob
    }

    pub fn records(&self) -> &[TenderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent persist failure, cleared by the next successful persist.
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    /// Why the last `load` could not read the stored collection, if it could not.
    pub fn read_error(&self) -> Option<&StorageError> {
        self.read_error.as_ref()
    }

    pub fn get(&self, id: &TenderId) -> Option<&TenderRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    fn position(&self, id: &TenderId) -> DomainResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| DomainError::not_found(format!("tender {id}")))
    }

    /// Records matching `query`, in collection order.
    ///
    /// The iterator is lazy and `Clone`, so it can be walked more than once.
    pub fn list<'a>(
        &'a self,
        query: &'a TenderQuery,
    ) -> impl Iterator<Item = &'a TenderRecord> + Clone + 'a {
        self.records.iter().filter(move |r| query.matches(r))
    }

    /// Add a tender under a freshly generated id.
    pub fn add(&mut self, fields: TenderFields) -> DomainResult<TenderId> {
        let record = TenderRecord::new(TenderId::generate(), fields)?;
        Ok(self.prepend(record))
    }

    /// Add a tender under an id chosen by the caller (the add form shows a
    /// pre-generated id). Fails if the id is already taken.
    pub fn add_with_id(&mut self, id: TenderId, fields: TenderFields) -> DomainResult<TenderId> {
        if self.get(&id).is_some() {
            return Err(DomainError::conflict(format!("tender {id} already exists")));
        }
        let record = TenderRecord::new(id, fields)?;
        Ok(self.prepend(record))
    }

    fn prepend(&mut self, record: TenderRecord) -> TenderId {
        let id = record.id().clone();
        self.records.insert(0, record);
        tracing::debug!(%id, "added tender");
        self.commit();
        id
    }

    /// Overwrite every mutable field of a tender, keeping its id and position.
    pub fn edit(&mut self, id: &TenderId, fields: TenderFields) -> DomainResult<()> {
        let idx = self.position(id)?;
        self.records[idx].apply(fields)?;
        tracing::debug!(%id, "edited tender");
        self.commit();
        Ok(())
    }

    /// Remove a tender. Absent ids are a no-op; returns whether one was removed.
    pub fn remove(&mut self, id: &TenderId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;
        tracing::debug!(%id, removed, "removed tender");
        self.commit();
        removed
    }

    /// Prepend a deep copy of a tender under a fresh id, marked as a clone.
    pub fn clone_tender(&mut self, id: &TenderId) -> DomainResult<TenderId> {
        let idx = self.position(id)?;
        let copy = self.records[idx].duplicate(TenderId::generate());
        tracing::debug!(source = %id, clone = %copy.id(), "cloned tender");
        Ok(self.prepend(copy))
    }

    pub fn stats(&self) -> TenderStats {
        TenderStats::from_records(&self.records)
    }

    /// CSV of the whole collection, regardless of any active filter.
    pub fn export_csv(&self) -> Result<ExportArtifact, ExportError> {
        let artifact = export_csv(&self.records)?;
        tracing::info!(rows = self.records.len(), file = artifact.file_name, "exported tenders");
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use std::collections::HashSet;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tenderdesk_tenders::{CLONE_MARKER, StatusFilter, TenderStatus, TenderValue};

    fn empty_store() -> RecordStore<Arc<InMemoryBlobStore>> {
        let blob = Arc::new(InMemoryBlobStore::with_entry(DEFAULT_STORAGE_KEY, "[]"));
        RecordStore::open(blob)
    }

    fn stored(blob: &Arc<InMemoryBlobStore>) -> Vec<TenderRecord> {
        stored_in(blob)
    }

    fn stored_in(blob: &InMemoryBlobStore) -> Vec<TenderRecord> {
        let raw = blob.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        schema::decode(&raw).unwrap().records
    }

    fn pending(name: &str, value: f64) -> TenderFields {
        TenderFields {
            status: TenderStatus::Pending,
            value: TenderValue::new(value).unwrap(),
            ..TenderFields::named(name)
        }
    }

    #[test]
    fn load_seeds_and_persists_when_nothing_is_stored() {
        let blob = Arc::new(InMemoryBlobStore::new());
        let mut store = RecordStore::new(blob.clone());

        let outcome = store.load();

        let seeds = seed_records();
        assert_eq!(
            outcome,
            LoadOutcome::Seeded {
                count: seeds.len(),
                reason: SeedReason::Absent
            }
        );
        assert_eq!(store.records(), seeds.as_slice());
        assert_eq!(stored(&blob), seeds);
    }

    #[test]
    fn load_treats_malformed_data_as_absent() {
        let blob = Arc::new(InMemoryBlobStore::with_entry(DEFAULT_STORAGE_KEY, "{oops"));
        let mut store = RecordStore::new(blob.clone());

        let outcome = store.load();

        assert!(matches!(
            outcome,
            LoadOutcome::Seeded {
                reason: SeedReason::Malformed,
                ..
            }
        ));
        assert_eq!(store.len(), seed_records().len());
        assert_eq!(stored(&blob).len(), store.len());
    }

    /// Holds real data but fails reads until `heal` is called.
    struct FlakyRead {
        inner: InMemoryBlobStore,
        failing: AtomicBool,
    }

    impl FlakyRead {
        fn holding(raw: &str) -> Self {
            Self {
                inner: InMemoryBlobStore::with_entry(DEFAULT_STORAGE_KEY, raw),
                failing: AtomicBool::new(true),
            }
        }

        fn heal(&self) {
            self.failing.store(false, Ordering::SeqCst);
        }
    }

    impl BlobStore for FlakyRead {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::io(
                    key,
                    io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                ));
            }
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    const USER_DATA: &str = r#"[{"id":"CPUSER01","name":"Mine","org":"","status":"Draft","value":0,"deadline":"","note":""}]"#;

    #[test]
    fn unreadable_storage_seeds_in_memory_and_never_overwrites() {
        let blob = Arc::new(FlakyRead::holding(USER_DATA));
        let mut store = RecordStore::new(blob.clone());

        let outcome = store.load();

        assert!(matches!(
            outcome,
            LoadOutcome::Seeded {
                reason: SeedReason::Unreadable,
                ..
            }
        ));
        assert_eq!(store.len(), seed_records().len());
        assert!(matches!(store.read_error(), Some(StorageError::Io { .. })));
        assert!(matches!(
            store.last_persist_error(),
            Some(StorageError::UnreadSource { .. })
        ));
        assert_eq!(blob.inner.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some(USER_DATA));

        store.add(TenderFields::named("session only")).unwrap();
        assert!(store.persist().is_err());
        assert_eq!(blob.inner.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some(USER_DATA));
    }

    #[test]
    fn successful_reload_after_read_failure_restores_and_allows_writes() {
        let blob = Arc::new(FlakyRead::holding(USER_DATA));
        let mut store = RecordStore::new(blob.clone());
        store.load();

        blob.heal();
        assert_eq!(
            store.load(),
            LoadOutcome::Restored {
                count: 1,
                normalized: 0
            }
        );
        assert!(store.read_error().is_none());
        assert_eq!(store.records()[0].id().as_str(), "CPUSER01");

        store.add(TenderFields::named("second")).unwrap();
        assert!(store.last_persist_error().is_none());
        assert_eq!(stored_in(&blob.inner).len(), 2);
    }

    #[test]
    fn load_writes_back_normalized_records() {
        let blob = Arc::new(InMemoryBlobStore::with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"id":"CP1","name":"Old"}]"#,
        ));
        let store = RecordStore::open(blob.clone());

        assert_eq!(store.len(), 1);
        let raw = blob.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"status\":\"Draft\""));
        assert!(raw.contains("\"org\":\"\""));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let blob = Arc::new(InMemoryBlobStore::new());
        let mut store = RecordStore::open(blob.clone());
        store.add(pending("Quoted \"name\", with comma", 12.5)).unwrap();

        let reloaded = RecordStore::open(blob);
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn add_prepends_and_counts() {
        let mut store = empty_store();
        let id = store.add(pending("X", 500.0)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.pending(), 1);
        assert_eq!(stats.total(), 1);
        assert_eq!(store.records()[0].id(), &id);

        let second = store.add(TenderFields::named("Y")).unwrap();
        assert_eq!(store.records()[0].id(), &second);
        assert_eq!(store.records()[1].id(), &id);
    }

    #[test]
    fn add_persists_the_whole_collection() {
        let blob = Arc::new(InMemoryBlobStore::with_entry(DEFAULT_STORAGE_KEY, "[]"));
        let mut store = RecordStore::open(blob.clone());
        store.add(TenderFields::named("A")).unwrap();
        store.add(TenderFields::named("B")).unwrap();
        assert_eq!(stored(&blob), store.records());
    }

    #[test]
    fn add_rejects_invalid_fields_without_persisting() {
        let mut store = empty_store();
        let err = store.add(TenderFields::named("")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_with_id_keeps_caller_id_and_rejects_duplicates() {
        let mut store = empty_store();
        let id: TenderId = "CPDRAFT1".parse().unwrap();
        assert_eq!(store.add_with_id(id.clone(), TenderFields::named("A")).unwrap(), id);

        let err = store
            .add_with_id(id.clone(), TenderFields::named("B"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn many_adds_produce_distinct_ids() {
        let mut store = empty_store();
        for i in 0..500 {
            store.add(TenderFields::named(format!("t{i}"))).unwrap();
        }
        let ids: HashSet<_> = store.records().iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn edit_overwrites_in_place() {
        let mut store = empty_store();
        let first = store.add(TenderFields::named("first")).unwrap();
        let second = store.add(TenderFields::named("second")).unwrap();

        store.edit(&first, pending("first, revised", 10.0)).unwrap();

        assert_eq!(store.records()[0].id(), &second);
        let edited = &store.records()[1];
        assert_eq!(edited.id(), &first);
        assert_eq!(edited.name(), "first, revised");
        assert_eq!(edited.status(), TenderStatus::Pending);
    }

    #[test]
    fn edit_missing_id_is_not_found() {
        let mut store = empty_store();
        let err = store
            .edit(&"CPNOPE00".parse().unwrap(), TenderFields::named("x"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = empty_store();
        let id = store.add(TenderFields::named("doomed")).unwrap();
        store.add(TenderFields::named("kept")).unwrap();

        assert!(store.remove(&id));
        let after_first = store.records().to_vec();
        assert!(!store.remove(&id));
        assert_eq!(store.records(), after_first.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clone_prepends_marked_copy() {
        let mut store = empty_store();
        let id: TenderId = "CP1".parse().unwrap();
        store.add_with_id(id.clone(), pending("Bridge", 100.0)).unwrap();

        let copy_id = store.clone_tender(&id).unwrap();

        assert_eq!(store.len(), 2);
        assert_ne!(copy_id, id);
        let copy = &store.records()[0];
        assert_eq!(copy.id(), &copy_id);
        assert!(copy.name().ends_with(CLONE_MARKER));
        assert_eq!(copy.value(), store.records()[1].value());
        assert_eq!(store.records()[1].name(), "Bridge");
    }

    #[test]
    fn clone_missing_id_is_not_found() {
        let mut store = empty_store();
        assert!(store.clone_tender(&"CP404".parse().unwrap()).unwrap_err().is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn list_is_restartable_and_ordered() {
        let mut store = empty_store();
        store.add(pending("alpha road", 1.0)).unwrap();
        store.add(TenderFields::named("beta road")).unwrap();
        store.add(pending("gamma bridge", 1.0)).unwrap();

        let query = TenderQuery::new("ROAD", StatusFilter::All);
        let iter = store.list(&query);
        let first: Vec<_> = iter.clone().map(|r| r.name().to_string()).collect();
        let second: Vec<_> = iter.map(|r| r.name().to_string()).collect();
        assert_eq!(first, vec!["beta road", "alpha road"]);
        assert_eq!(first, second);

        let query = TenderQuery::new("", TenderStatus::Pending.into());
        let names: Vec<_> = store.list(&query).map(|r| r.name()).collect();
        assert_eq!(names, vec!["gamma bridge", "alpha road"]);
    }

    #[test]
    fn persist_failure_keeps_memory_state_and_is_reported() {
        let blob = Arc::new(InMemoryBlobStore::with_quota(64));
        let mut store = RecordStore::with_key(blob.clone(), "k");
        // Seeding already overflows the quota.
        store.load();
        assert!(matches!(
            store.last_persist_error(),
            Some(StorageError::QuotaExceeded { .. })
        ));
        let seeded = store.len();

        let id = store.add(TenderFields::named("still here")).unwrap();
        assert_eq!(store.len(), seeded + 1);
        assert!(store.get(&id).is_some());
        assert!(store.last_persist_error().is_some());
        assert_eq!(blob.get("k").unwrap(), None);
    }

    #[test]
    fn successful_persist_clears_previous_failure() {
        let blob = Arc::new(InMemoryBlobStore::with_quota(200));
        let mut store = RecordStore::with_key(blob.clone(), "k");
        store.load();
        assert!(store.last_persist_error().is_some());

        let ids: Vec<TenderId> = store.records().iter().map(|r| r.id().clone()).collect();
        for id in &ids {
            store.remove(id);
        }
        assert!(store.last_persist_error().is_none());
        assert_eq!(blob.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn export_ignores_filters_and_covers_everything() {
        let mut store = empty_store();
        store.add(pending("one", 1.0)).unwrap();
        store.add(TenderFields::named("two")).unwrap();
        let body = store.export_csv().unwrap().body;
        assert_eq!(body.lines().count(), 3);
        assert!(body.starts_with("id,name,status,value,deadline,org,note\n"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_fields() -> impl Strategy<Value = TenderFields> {
            (
                "\\PC{1,24}",
                ".{0,16}",
                prop::sample::select(TenderStatus::ALL.to_vec()),
                0u64..10_000_000_000,
                "[0-9-]{0,10}",
                ".{0,32}",
            )
                .prop_filter("name must not be blank", |(name, ..)| !name.trim().is_empty())
                .prop_map(|(name, org, status, value, deadline, note)| TenderFields {
                    name,
                    org,
                    status,
                    value: TenderValue::new(value as f64).unwrap(),
                    deadline,
                    note,
                })
        }

        proptest! {
            /// Property: persist then load reproduces the exact sequence.
            #[test]
            fn persist_load_round_trip(fields in prop::collection::vec(arb_fields(), 0..20)) {
                let blob = Arc::new(InMemoryBlobStore::with_entry(DEFAULT_STORAGE_KEY, "[]"));
                let mut store = RecordStore::open(blob.clone());
                for f in fields {
                    store.add(f).unwrap();
                }

                let mut reloaded = RecordStore::new(blob);
                let outcome = reloaded.load();
                prop_assert_eq!(outcome, LoadOutcome::Restored { count: store.len(), normalized: 0 });
                prop_assert_eq!(reloaded.records(), store.records());
            }

            /// Property: listing twice with the same query yields the same sequence.
            #[test]
            fn list_is_idempotent(
                fields in prop::collection::vec(arb_fields(), 0..20),
                text in "[a-z]{0,3}",
            ) {
                let mut store = empty_store();
                for f in fields {
                    store.add(f).unwrap();
                }
                let query = TenderQuery::new(&text, StatusFilter::All);
                let a: Vec<_> = store.list(&query).collect();
                let b: Vec<_> = store.list(&query).collect();
                prop_assert_eq!(a, b);
            }
        }
    }
}
