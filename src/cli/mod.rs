//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod export;
pub mod record;

pub use audit::handle_audit_command;
pub use export::handle_export_command;
pub use record::{handle_record_command, RecordCommands};
