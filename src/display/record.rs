//! Record display formatting

use crate::export::CSV_HEADERS;
use crate::models::Record;

/// Shown instead of a table when there are no records
pub const EMPTY_STATE_MESSAGE: &str = "אין עדיין רשומות.";

/// Placeholder for empty cells
const EMPTY_CELL: &str = "-";

/// One table row: the record id plus its six display cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: String,
    pub cells: [String; 6],
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.to_string(),
            cells: record.columns().map(|value| {
                if value.is_empty() {
                    EMPTY_CELL.to_string()
                } else {
                    value.to_string()
                }
            }),
        }
    }
}

/// Format records as a column-aligned table, newest first
pub fn format_record_table(records: &[Record]) -> String {
    if records.is_empty() {
        return EMPTY_STATE_MESSAGE.to_string();
    }

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();

    let mut widths = [0usize; 7];
    widths[0] = rows.iter().map(|r| width(&r.id)).max().unwrap_or(0).max(2);
    for (i, header) in CSV_HEADERS.iter().enumerate() {
        widths[i + 1] = rows
            .iter()
            .map(|r| width(&r.cells[i]))
            .max()
            .unwrap_or(0)
            .max(width(header));
    }

    let mut output = String::new();

    let header: Vec<&str> = std::iter::once("ID").chain(CSV_HEADERS).collect();
    push_line(&mut output, &header, &widths);

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let separator: Vec<&str> = separator.iter().map(String::as_str).collect();
    push_line(&mut output, &separator, &widths);

    for row in &rows {
        let cells: Vec<&str> = std::iter::once(row.id.as_str())
            .chain(row.cells.iter().map(String::as_str))
            .collect();
        push_line(&mut output, &cells, &widths);
    }

    output.push_str(&format!("\nTotal: {} records\n", rows.len()));
    output
}

/// Format a single record's details
pub fn format_record_details(record: &Record) -> String {
    let row = RecordRow::from(record);
    let label_width = CSV_HEADERS.iter().map(|h| width(h)).max().unwrap_or(0);

    let mut output = String::new();
    output.push_str(&format!("Record: {}\n", row.id));
    for (label, value) in CSV_HEADERS.iter().zip(row.cells.iter()) {
        output.push_str(&format!("  {}  {}\n", pad(label, label_width), value));
    }
    output
}

fn push_line(output: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad(&single_line(cell), *w))
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

/// Character count, which is what terminals align Hebrew and ASCII by
fn width(s: &str) -> usize {
    single_line(s).chars().count()
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Notes may contain newlines, which would break the table
fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}
