//! CSV exporter for the filtered view
//!
//! Booleans are written as bare `TRUE`/`FALSE` and every other value as a
//! double-quoted string. Embedded quotes, commas and newlines are NOT escaped,
//! so values containing them produce CSV that other tools will misread.

use crate::model::{field_value, Column, Row, Value};

/// Serialized export ready for the host to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
    /// Data rows written, excluding the header
    pub row_count: usize,
}

/// Header line plus one line per row, joined by `\n` without a trailing newline
pub fn export<'r>(columns: &[Column], rows: impl IntoIterator<Item = &'r Row>) -> String {
    let header = columns
        .iter()
        .map(Column::header)
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| export_cell(field_value(row, &column.field)))
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn export_cell(value: &Value) -> String {
    match value {
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => format!("\"{}\"", other),
    }
}
