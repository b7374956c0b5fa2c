//! User settings for crm-cli
//!
//! Manages the timestamp format used for new records, the default export
//! directory and whether mutations are written to the audit log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::CrmPaths;
use crate::error::CrmError;
use crate::models::record::validate_timestamp_format;

/// User settings for crm-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// strftime format for `createdAt` (he-IL style by default)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Where `export` writes CSV files when `--output` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Whether record mutations are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timestamp_format() -> String {
    crate::models::record::DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            timestamp_format: default_timestamp_format(),
            export_dir: None,
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &CrmPaths) -> Result<Self, CrmError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| CrmError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CrmError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            validate_timestamp_format(&settings.timestamp_format)?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CrmPaths) -> Result<(), CrmError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CrmError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CrmError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
