//! Core data models for crm-cli
//!
//! A contact record, the input used to create one, and its identifier.

pub mod ids;
pub mod record;

pub use ids::RecordId;
pub use record::{NewRecord, Record};
