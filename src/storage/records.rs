//! Record store
//!
//! Owns the ordered, newest-first record list and keeps it mirrored in a
//! `KeyValueStore` under a single key. Every mutation rewrites the whole
//! list; there is no incremental persistence.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::CrmResult;
use crate::models::{NewRecord, Record, RecordId};
use crate::models::record::DEFAULT_TIMESTAMP_FORMAT;

use super::kv::KeyValueStore;

/// Storage key holding the serialized record list
pub const RECORDS_KEY: &str = "offline-crm-records-v1";

/// Why a persisted blob could not be turned into records
#[derive(Debug)]
pub struct CorruptState {
    reason: String,
}

impl fmt::Display for CorruptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt record data: {}", self.reason)
    }
}

impl std::error::Error for CorruptState {}

/// Decode a stored blob as a JSON array of records
pub fn decode_records(raw: &[u8]) -> Result<Vec<Record>, CorruptState> {
    let value: serde_json::Value = serde_json::from_slice(raw).map_err(|e| CorruptState {
        reason: e.to_string(),
    })?;

    if !value.is_array() {
        return Err(CorruptState {
            reason: "top-level value is not an array".into(),
        });
    }

    serde_json::from_value(value).map_err(|e| CorruptState {
        reason: e.to_string(),
    })
}

/// Serialize records the way they are persisted
pub fn encode_records(records: &[Record]) -> CrmResult<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

/// Authoritative in-memory + persisted record sequence
pub struct RecordStore<S: KeyValueStore> {
    backend: S,
    records: Vec<Record>,
    timestamp_format: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Open a store and load whatever the backend holds
    ///
    /// Corrupt data is treated as an empty store. Only a failed read of the
    /// backend itself is an error.
    pub fn load(backend: S) -> CrmResult<Self> {
        let records = match backend.load(RECORDS_KEY)? {
            None => Vec::new(),
            Some(raw) => decode_records(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable record data");
                Vec::new()
            }),
        };

        debug!(count = records.len(), "loaded records");

        Ok(Self {
            backend,
            records,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        })
    }

    /// Use a different strftime format for `createdAt` of new records
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Records in display order (newest first)
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Create a record from already-trimmed fields and put it first
    pub fn add(&mut self, fields: NewRecord) -> CrmResult<Record> {
        let record = Record::new(fields, &self.timestamp_format)?;

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());

        self.commit(next)?;
        info!(id = %record.id, "added record");
        Ok(record)
    }

    /// Remove the record with exactly this id
    ///
    /// Returns `None` without writing anything when no record matches.
    pub fn delete_by_id(&mut self, id: &RecordId) -> CrmResult<Option<Record>> {
        let Some(pos) = self.records.iter().position(|r| &r.id == id) else {
            debug!(%id, "delete of unknown id ignored");
            return Ok(None);
        };

        let mut next = self.records.clone();
        let removed = next.remove(pos);

        self.commit(next)?;
        info!(%id, "deleted record");
        Ok(Some(removed))
    }

    /// Remove every record
    ///
    /// Returns `false` without writing anything when the store is already
    /// empty.
    pub fn clear(&mut self) -> CrmResult<bool> {
        if self.records.is_empty() {
            return Ok(false);
        }

        let count = self.records.len();
        self.commit(Vec::new())?;
        info!(count, "cleared records");
        Ok(true)
    }

    /// Write the current sequence to the backend
    pub fn persist(&mut self) -> CrmResult<()> {
        let raw = encode_records(&self.records)?;
        self.backend.save(RECORDS_KEY, &raw)
    }

    /// Persist `next` and only then adopt it, so memory never runs ahead of
    /// storage
    fn commit(&mut self, next: Vec<Record>) -> CrmResult<()> {
        let raw = encode_records(&next)?;
        if let Err(e) = self.backend.save(RECORDS_KEY, &raw) {
            warn!(error = %e, "record write failed; in-memory state unchanged");
            return Err(e);
        }
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrmError;
    use crate::storage::kv::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn fields(name: &str) -> NewRecord {
        NewRecord {
            full_name: name.to_string(),
            ..NewRecord::default()
        }
    }

    fn empty_store() -> RecordStore<MemoryStore> {
        RecordStore::load(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_newest_first() {
        let mut store = empty_store();
        let a = store.add(fields("A")).unwrap();
        let b = store.add(fields("B")).unwrap();

        let ids: Vec<_> = store.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_every_mutation_writes_full_list() {
        let mut store = empty_store();
        store.add(fields("A")).unwrap();
        store.add(fields("B")).unwrap();

        let raw = store.backend().get(RECORDS_KEY).unwrap();
        let persisted = decode_records(raw).unwrap();
        assert_eq!(persisted, store.records());
        assert_eq!(store.backend().write_count(), 2);
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = RecordStore::load(FileStore::new(temp_dir.path())).unwrap();
        store.add(fields("A")).unwrap();
        store
            .add(NewRecord {
                full_name: "B".into(),
                phone: "03-555".into(),
                email: "b@x.com".into(),
                company: "Beta".into(),
                notes: "line1\nline2".into(),
            })
            .unwrap();
        store.persist().unwrap();

        let reloaded = RecordStore::load(FileStore::new(temp_dir.path())).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_delete_by_id() {
        let mut store = empty_store();
        let a = store.add(fields("A")).unwrap();
        let b = store.add(fields("B")).unwrap();

        let removed = store.delete_by_id(&a.id).unwrap();
        assert_eq!(removed.map(|r| r.id), Some(a.id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, b.id);

        let persisted = decode_records(store.backend().get(RECORDS_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = empty_store();
        store.add(fields("A")).unwrap();
        let before = store.backend().get(RECORDS_KEY).unwrap().to_vec();
        let writes = store.backend().write_count();

        let removed = store.delete_by_id(&RecordId::from("nonexistent")).unwrap();

        assert!(removed.is_none());
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(encode_records(store.records()).unwrap(), before);
    }

    #[test]
    fn test_clear_twice() {
        let mut store = empty_store();
        store.add(fields("A")).unwrap();
        store.add(fields("B")).unwrap();

        assert!(store.clear().unwrap());
        let writes = store.backend().write_count();
        assert!(!store.clear().unwrap());

        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), writes);
        assert_eq!(store.backend().get(RECORDS_KEY).unwrap(), b"[]");
    }

    #[test]
    fn test_clear_empty_does_not_write() {
        let mut store = empty_store();
        assert!(!store.clear().unwrap());
        assert!(store.backend().get(RECORDS_KEY).is_none());
    }

    #[test]
    fn test_corrupt_state_recovers_empty() {
        for raw in ["not-json", "{\"id\":\"x\"}", "42", "[1,2,3]", "[{\"fullName\":\"no id\"}]"] {
            let store = RecordStore::load(MemoryStore::with_entry(RECORDS_KEY, raw)).unwrap();
            assert!(store.is_empty(), "{} should load as empty", raw);
        }
    }

    #[test]
    fn test_decode_records_reports_reason() {
        let err = decode_records(b"not-json").unwrap_err();
        assert!(err.to_string().starts_with("corrupt record data"));

        let err = decode_records(b"{}").unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }

    #[test]
    fn test_existing_data_loads() {
        let raw = r#"[{"id":"b","fullName":"B","phone":"","email":"","company":"","notes":"","createdAt":"1.1.2026, 10:00:00"},
                      {"id":"a","fullName":"A","phone":"","email":"","company":"","notes":"","createdAt":"1.1.2026, 09:00:00"}]"#;
        let store = RecordStore::load(MemoryStore::with_entry(RECORDS_KEY, raw)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].full_name, "B");
        assert!(store.get(&RecordId::from("a")).is_some());
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let mut store = empty_store();
        let a = store.add(fields("A")).unwrap();

        let mut backend = store.backend().clone();
        backend.set_fail_writes(true);
        let mut store = RecordStore::load(backend).unwrap();

        let err = store.add(fields("B")).unwrap_err();
        assert!(matches!(err, CrmError::Storage(_)));
        assert_eq!(store.len(), 1);

        assert!(store.delete_by_id(&a.id).is_err());
        assert_eq!(store.len(), 1);

        assert!(store.clear().is_err());
        assert_eq!(store.records()[0].id, a.id);
    }

    #[test]
    fn test_custom_timestamp_format() {
        let mut store = empty_store().with_timestamp_format("fixed");
        let record = store.add(fields("A")).unwrap();
        assert_eq!(record.created_at, "fixed");
    }

    #[test]
    fn test_invalid_timestamp_format_fails_add_without_writing() {
        let mut store = empty_store().with_timestamp_format("%Q");

        let err = store.add(fields("A")).unwrap_err();
        assert!(matches!(err, CrmError::Config(_)));
        assert!(store.is_empty());
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_null_field_keeps_other_records() {
        let raw = r#"[{"id":"a","fullName":"A","phone":null,"email":"","company":"","notes":"","createdAt":""},
                      {"id":"b","fullName":"B","phone":"03","email":"","company":"","notes":"","createdAt":""}]"#;
        let store = RecordStore::load(MemoryStore::with_entry(RECORDS_KEY, raw)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].phone, "");
        assert_eq!(store.records()[1].phone, "03");
    }
}
