//! CLI command for viewing the audit log

use crate::error::CrmResult;
use crate::storage::{KeyValueStore, Storage};

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command<S: KeyValueStore>(storage: &Storage<S>, limit: usize) -> CrmResult<()> {
    let Some(logger) = storage.audit() else {
        println!("Audit logging is disabled.");
        return Ok(());
    };

    let entries = logger.read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
