//! Key-value storage backends
//!
//! `RecordStore` only needs to load and save one opaque blob by key. The
//! `KeyValueStore` trait is that seam; `FileStore` backs it with one file per
//! key and `MemoryStore` keeps everything in process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CrmError, CrmResult};

use super::file_io::{read_bytes, write_bytes_atomic};

/// Raw byte storage addressed by string keys
pub trait KeyValueStore {
    /// Read the value under `key`, or `None` if nothing was ever saved
    fn load(&self, key: &str) -> CrmResult<Option<Vec<u8>>>;

    /// Replace the value under `key`
    fn save(&mut self, key: &str, value: &[u8]) -> CrmResult<()>;
}

/// File-per-key store rooted at a directory
///
/// Key `k` lives at `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path backing `key`
    pub fn path_for(&self, key: &str) -> CrmResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> CrmResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        debug!(path = %path.display(), "reading key");
        read_bytes(&path)
    }

    fn save(&mut self, key: &str, value: &[u8]) -> CrmResult<()> {
        let path = self.path_for(key)?;
        debug!(path = %path.display(), bytes = value.len(), "writing key");
        write_bytes_atomic(&path, value)
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> CrmResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(CrmError::Validation(format!("Invalid storage key: {:?}", key)))
    }
}

/// In-process store, mainly a test double
///
/// `fail_writes` makes every `save` fail, simulating a full disk or quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.into(), value.into());
        store
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful saves so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> CrmResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &[u8]) -> CrmResult<()> {
        if self.fail_writes {
            return Err(CrmError::Storage(format!(
                "Write to {:?} rejected: storage quota exceeded",
                key
            )));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        self.writes += 1;
        Ok(())
    }
}
