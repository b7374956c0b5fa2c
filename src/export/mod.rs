//! Export module for crm-cli
//!
//! Records are exported as a spreadsheet-friendly CSV document.

pub mod csv;

pub use csv::{export_file_name, export_records_csv, CSV_HEADERS, CSV_MIME_TYPE, UTF8_BOM};
