//! CLI command for CSV export

use std::path::PathBuf;

use chrono::Utc;

use crate::config::Settings;
use crate::error::CrmResult;
use crate::export::export_file_name;
use crate::services::RecordService;
use crate::storage::{write_bytes_atomic, KeyValueStore, Storage};

/// Export all records to `crm-records-<date>.csv` and return the file path
///
/// The file goes into `output`, else the configured export directory, else
/// the current directory.
pub fn handle_export_command<S: KeyValueStore>(
    storage: &mut Storage<S>,
    settings: &Settings,
    output: Option<PathBuf>,
) -> CrmResult<PathBuf> {
    let service = RecordService::new(storage);
    let bytes = service.export_csv()?;
    let count = service.list().len();

    let dir = output
        .or_else(|| settings.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(export_file_name(Utc::now().date_naive()));

    write_bytes_atomic(&path, &bytes)?;

    println!("Exported {} records to: {}", count, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrmError;
    use crate::export::UTF8_BOM;
    use crate::models::NewRecord;
    use crate::storage::{MemoryStore, RecordStore};
    use tempfile::TempDir;

    fn storage_with(names: &[&str]) -> Storage<MemoryStore> {
        let mut records = RecordStore::load(MemoryStore::new()).unwrap();
        for name in names {
            records
                .add(NewRecord {
                    full_name: name.to_string(),
                    ..NewRecord::default()
                })
                .unwrap();
        }
        Storage::with_store(records, None)
    }

    #[test]
    fn test_export_writes_dated_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage_with(&["Dana"]);

        let path = handle_export_command(
            &mut storage,
            &Settings::default(),
            Some(temp_dir.path().to_path_buf()),
        )
        .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("crm-records-"));
        assert!(name.ends_with(".csv"));

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_export_uses_settings_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage_with(&["Dana"]);
        let settings = Settings {
            export_dir: Some(temp_dir.path().join("exports")),
            ..Settings::default()
        };

        let path = handle_export_command(&mut storage, &settings, None).unwrap();
        assert!(path.starts_with(temp_dir.path().join("exports")));
        assert!(path.exists());
    }

    #[test]
    fn test_write_failure_reports_storage_error_once() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let mut storage = storage_with(&["Dana"]);

        let err = handle_export_command(&mut storage, &Settings::default(), Some(blocker))
            .unwrap_err();

        assert!(matches!(err, CrmError::Storage(_)));
        let message = err.to_string();
        assert!(message.starts_with("Storage error:"), "{}", message);
        assert_eq!(message.matches("Storage error").count(), 1, "{}", message);
        assert!(!message.contains("Export error"));
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = storage_with(&[]);

        let err = handle_export_command(
            &mut storage,
            &Settings::default(),
            Some(temp_dir.path().to_path_buf()),
        )
        .unwrap_err();

        assert!(err.is_nothing_to_export());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
