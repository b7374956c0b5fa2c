//! Path management for crm-cli
//!
//! ## Path Resolution Order
//!
//! 1. `CRM_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/crm-cli` on Linux,
//!    `~/Library/Application Support/crm-cli` on macOS, `%APPDATA%\crm-cli`
//!    on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::CrmError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CRM_CLI_DATA_DIR";

const APP_DIR_NAME: &str = "crm-cli";

/// Manages all paths used by crm-cli
#[derive(Debug, Clone)]
pub struct CrmPaths {
    base_dir: PathBuf,
}

impl CrmPaths {
    /// Create a new CrmPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, CrmError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CrmPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the key-value store files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), CrmError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CrmError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| CrmError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, CrmError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| CrmError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join(APP_DIR_NAME))
}
