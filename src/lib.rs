//! crm-cli - Offline contact record manager
//!
//! Keeps an ordered, newest-first list of contact records in a local
//! key-value store and exports it as CSV.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: The contact record and its id
//! - `storage`: Key-value backends and the record store
//! - `services`: Business logic layer
//! - `export`: CSV export
//! - `display`: Terminal table formatting
//! - `audit`: Audit logging system
//! - `cli`: Command handlers for the `crm` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use crm::models::NewRecord;
//! use crm::storage::{MemoryStore, RecordStore};
//!
//! let mut store = RecordStore::load(MemoryStore::new())?;
//! store.add(NewRecord { full_name: "Dana".into(), ..Default::default() })?;
//! let csv = crm::export::export_records_csv(store.records())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{CrmError, CrmResult};
