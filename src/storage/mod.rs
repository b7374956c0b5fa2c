//! Storage layer for crm-cli
//!
//! A raw key-value backend (`FileStore` on disk, `MemoryStore` in tests), the
//! `RecordStore` that keeps the record list mirrored in it, and the `Storage`
//! coordinator that pairs the store with the audit log.

pub mod file_io;
pub mod kv;
pub mod records;

pub use file_io::{read_bytes, write_bytes_atomic};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use records::{decode_records, encode_records, CorruptState, RecordStore, RECORDS_KEY};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{CrmPaths, Settings};
use crate::error::CrmResult;

/// Record store plus the optional audit log that mutations are reported to
pub struct Storage<S: KeyValueStore = FileStore> {
    pub records: RecordStore<S>,
    audit: Option<AuditLogger>,
}

impl Storage<FileStore> {
    /// Open the on-disk store described by `paths` and `settings`
    pub fn open(paths: &CrmPaths, settings: &Settings) -> CrmResult<Self> {
        paths.ensure_directories()?;

        let records = RecordStore::load(FileStore::new(paths.data_dir()))?
            .with_timestamp_format(settings.timestamp_format.clone());
        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));

        Ok(Self { records, audit })
    }
}

impl<S: KeyValueStore> Storage<S> {
    /// Wrap an already-loaded record store
    pub fn with_store(records: RecordStore<S>, audit: Option<AuditLogger>) -> Self {
        Self { records, audit }
    }

    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Log a create operation to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> CrmResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// Log a delete operation to the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> CrmResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::delete(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// Log a clear-all operation to the audit log
    pub fn log_clear(&self, entity_type: EntityType, removed: usize) -> CrmResult<()> {
        match &self.audit {
            Some(logger) => logger.log(&AuditEntry::clear(entity_type, removed)),
            None => Ok(()),
        }
    }
}
