//! CSV Export functionality
//!
//! Every field is quoted, embedded quotes are doubled, rows are separated by
//! `\n` with no separator after the last row, and the document starts with a
//! UTF-8 byte-order mark so spreadsheet tools pick the right encoding for the
//! Hebrew header.

use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use chrono::NaiveDate;

use crate::error::{CrmError, CrmResult};
use crate::models::Record;

/// Column labels, in export order
pub const CSV_HEADERS: [&str; 6] = ["שם מלא", "טלפון", "אימייל", "חברה", "הערות", "תאריך יצירה"];

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

const FILE_PREFIX: &str = "crm-records-";

/// Encode records as a CSV document
///
/// An empty slice is `CrmError::NothingToExport`, never a header-only file.
pub fn export_records_csv(records: &[Record]) -> CrmResult<Vec<u8>> {
    if records.is_empty() {
        return Err(CrmError::NothingToExport);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(record.columns())?;
    }

    let mut output = writer
        .into_inner()
        .map_err(|e| CrmError::Export(e.to_string()))?;

    // The writer terminates every row; the document has no trailing newline
    if output.last() == Some(&b'\n') {
        output.pop();
    }

    Ok(output)
}

/// File name for an export made on `date`, e.g. `crm-records-2026-10-19.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", FILE_PREFIX, date.format("%Y-%m-%d"))
}
