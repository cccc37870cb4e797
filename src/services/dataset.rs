//! Dataset loading
//!
//! `.json` files hold an array of objects. `.csv` files take field names from
//! the header row; cells that read as numbers or `true`/`false` are typed and
//! empty cells are null.

use anyhow::{bail, Context, Result};
use gridview::model::rows_from_json;
use gridview::{Row, Value};
use log::info;
use std::fs;
use std::path::Path;

pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let rows = match extension.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => bail!(
            "Unsupported dataset {}: expected a .json or .csv file",
            path.display()
        ),
    };

    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn load_json(path: &Path) -> Result<Vec<Row>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(rows_from_json(document))
}

fn load_csv(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(field, cell)| (field.clone(), parse_cell(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn parse_cell(cell: &str) -> Value {
    match cell {
        "" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match cell.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(cell.to_string()),
        },
    }
}
