//! Display formatting for terminal output
//!
//! Turns records into row view-models and formats them as tables and detail
//! views. Nothing here touches storage.

pub mod record;

pub use record::{format_record_details, format_record_table, RecordRow, EMPTY_STATE_MESSAGE};
