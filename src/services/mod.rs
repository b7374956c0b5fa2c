//! Service layer for crm-cli
//!
//! The service layer provides business logic on top of the storage layer:
//! input normalization, audit logging and export.

pub mod record;

pub use record::RecordService;
