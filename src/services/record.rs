//! Record service
//!
//! Provides the operations behind the add/delete/clear/export commands.
//!
//! A mutation is complete once the store has persisted it. Audit entries are
//! written afterwards; a failed audit write is logged and does not turn a
//! persisted change into an error.

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{CrmError, CrmResult};
use crate::export::export_records_csv;
use crate::models::{NewRecord, Record, RecordId};
use crate::storage::{KeyValueStore, Storage};

/// Service for record management
pub struct RecordService<'a, S: KeyValueStore> {
    storage: &'a mut Storage<S>,
}

impl<'a, S: KeyValueStore> RecordService<'a, S> {
    pub fn new(storage: &'a mut Storage<S>) -> Self {
        Self { storage }
    }

    /// Create a record from raw form input
    pub fn add(&mut self, input: NewRecord) -> CrmResult<Record> {
        let record = self.storage.records.add(input.trimmed())?;

        audited(self.storage.log_create(
            EntityType::Record,
            record.id.to_string(),
            Some(record.full_name.clone()),
            &record,
        ));

        Ok(record)
    }

    pub fn list(&self) -> &[Record] {
        self.storage.records.records()
    }

    /// Look up a record, failing with `NotFound` if it doesn't exist
    pub fn get(&self, id: &str) -> CrmResult<&Record> {
        self.storage
            .records
            .get(&RecordId::from(id))
            .ok_or_else(|| CrmError::record_not_found(id))
    }

    /// Delete by id; an unknown id is a silent no-op returning `None`
    pub fn delete(&mut self, id: &str) -> CrmResult<Option<Record>> {
        let removed = self.storage.records.delete_by_id(&RecordId::from(id))?;

        if let Some(record) = &removed {
            audited(self.storage.log_delete(
                EntityType::Record,
                record.id.to_string(),
                Some(record.full_name.clone()),
                record,
            ));
        }

        Ok(removed)
    }

    /// Remove all records, returning how many were removed
    pub fn clear(&mut self) -> CrmResult<usize> {
        let count = self.storage.records.len();
        if !self.storage.records.clear()? {
            return Ok(0);
        }

        audited(self.storage.log_clear(EntityType::Record, count));
        Ok(count)
    }

    /// CSV document for the current records
    pub fn export_csv(&self) -> CrmResult<Vec<u8>> {
        let bytes = export_records_csv(self.storage.records.records())?;
        info!(
            records = self.storage.records.len(),
            bytes = bytes.len(),
            "exported records"
        );
        Ok(bytes)
    }
}

fn audited(result: CrmResult<()>) {
    if let Err(e) = result {
        warn!(error = %e, "change saved but audit entry could not be written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLogger, Operation};
    use crate::export::UTF8_BOM;
    use crate::storage::{MemoryStore, RecordStore};
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage<MemoryStore>) {
        let temp_dir = TempDir::new().unwrap();
        let records = RecordStore::load(MemoryStore::new()).unwrap();
        let audit = AuditLogger::new(temp_dir.path().join("audit.log"));
        (temp_dir, Storage::with_store(records, Some(audit)))
    }

    fn dana() -> NewRecord {
        NewRecord {
            full_name: " Dana ".into(),
            phone: "050-1234567".into(),
            email: "d@x.com".into(),
            company: "Acme".into(),
            notes: "  ".into(),
        }
    }

    #[test]
    fn test_add_trims_and_audits() {
        let (_temp, mut storage) = test_storage();
        let mut service = RecordService::new(&mut storage);

        let record = service.add(dana()).unwrap();
        assert_eq!(record.full_name, "Dana");
        assert_eq!(record.notes, "");

        let entries = storage.audit().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_id, record.id.to_string());
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let (_temp, mut storage) = test_storage();
        let service = RecordService::new(&mut storage);

        assert!(service.get("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp, mut storage) = test_storage();
        let mut service = RecordService::new(&mut storage);
        let record = service.add(dana()).unwrap();

        assert!(service.delete("missing").unwrap().is_none());
        let removed = service.delete(record.id.as_str()).unwrap().unwrap();
        assert_eq!(removed.id, record.id);
        assert!(service.list().is_empty());

        let ops: Vec<_> = storage
            .audit()
            .unwrap()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Delete]);
    }

    #[test]
    fn test_clear() {
        let (_temp, mut storage) = test_storage();
        let mut service = RecordService::new(&mut storage);
        service.add(dana()).unwrap();
        service.add(dana()).unwrap();

        assert_eq!(service.clear().unwrap(), 2);
        assert_eq!(service.clear().unwrap(), 0);

        let entries = storage.audit().unwrap().read_all().unwrap();
        let clears: Vec<_> = entries
            .iter()
            .filter(|e| e.operation == Operation::Clear)
            .collect();
        assert_eq!(clears.len(), 1);
        assert_eq!(clears[0].summary.as_deref(), Some("removed 2 records"));
    }

    #[test]
    fn test_add_then_export() {
        let (_temp, mut storage) = test_storage();
        let mut service = RecordService::new(&mut storage);

        assert!(service.export_csv().unwrap_err().is_nothing_to_export());

        let record = service.add(dana()).unwrap();
        assert_eq!(service.list().len(), 1);

        let bytes = service.export_csv().unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<_> = text.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            format!(
                "\"Dana\",\"050-1234567\",\"d@x.com\",\"Acme\",\"\",\"{}\"",
                record.created_at
            )
        );
    }

    #[test]
    fn test_audit_failure_does_not_fail_saved_changes() {
        let temp_dir = TempDir::new().unwrap();
        let records = RecordStore::load(MemoryStore::new()).unwrap();
        let audit = AuditLogger::new(temp_dir.path().join("missing").join("audit.log"));
        let mut storage = Storage::with_store(records, Some(audit));
        let mut service = RecordService::new(&mut storage);

        let record = service.add(dana()).unwrap();
        service.add(dana()).unwrap();
        assert_eq!(service.list().len(), 2);

        let removed = service.delete(record.id.as_str()).unwrap();
        assert!(removed.is_some());
        assert_eq!(service.clear().unwrap(), 1);
        assert!(service.list().is_empty());

        assert_eq!(storage.records.backend().write_count(), 4);
        assert!(!storage.audit().unwrap().exists());
    }

    #[test]
    fn test_failed_write_is_not_audited() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = MemoryStore::new();
        backend.set_fail_writes(true);
        let records = RecordStore::load(backend).unwrap();
        let audit = AuditLogger::new(temp_dir.path().join("audit.log"));
        let mut storage = Storage::with_store(records, Some(audit));

        let mut service = RecordService::new(&mut storage);
        assert!(service.add(dana()).is_err());
        assert!(service.list().is_empty());
        assert!(!storage.audit().unwrap().exists());
    }
}
