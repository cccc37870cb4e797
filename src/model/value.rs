//! Cell values, rows and selection keys

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value inside a [`Row`]
///
/// Absent fields read as [`Value::Null`]. Nested JSON (arrays and objects)
/// is flattened to its compact JSON text when a row is built from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// An ordered record mapping field names to values
pub type Row = IndexMap<String, Value>;

static NULL: Value = Value::Null;

/// Look up `field` in `row`, treating a missing field as null
pub fn field_value<'a>(row: &'a Row, field: &str) -> &'a Value {
    row.get(field).unwrap_or(&NULL)
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual form of the value, or `None` for null
    ///
    /// Numbers print without a trailing `.0`, switch to exponent form
    /// (`1e+21`, `1e-7`) outside `1e-6..1e21`, and non-finite numbers print
    /// as `NaN`, `Infinity` and `-Infinity`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(nested.to_string())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Build a dataset from a parsed JSON document
///
/// A document that is not an array yields an empty dataset, and array
/// entries that are not objects become empty rows. Neither is an error.
pub fn rows_from_json(document: serde_json::Value) -> Vec<Row> {
    let serde_json::Value::Array(items) = document else {
        warn!("dataset document is not an array, using an empty dataset");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(fields) => fields
                .into_iter()
                .map(|(field, value)| (field, Value::from(value)))
                .collect(),
            _ => {
                warn!("dataset entry {} is not an object, treating it as empty", index);
                Row::new()
            }
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selection Keys
// ═══════════════════════════════════════════════════════════════════════════════

/// Hashable identity of a row, taken from its selection key field
///
/// Numbers compare the way a JavaScript `Set` compares them: `-0` equals `0`
/// and `NaN` equals `NaN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl Key {
    /// Key for a value; null values have no identity
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Key::Bool(*b)),
            Value::Number(n) => Some(Key::number(*n)),
            Value::Text(s) => Some(Key::Text(s.clone())),
        }
    }

    fn number(n: f64) -> Key {
        let canonical = if n.is_nan() {
            f64::NAN
        } else if n == 0.0 {
            0.0
        } else {
            n
        };
        Key::Number(canonical.to_bits())
    }

    /// The key as a value again
    pub fn to_value(&self) -> Value {
        match self {
            Key::Bool(b) => Value::Bool(*b),
            Key::Number(bits) => Value::Number(f64::from_bits(*bits)),
            Key::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key::number(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::number(n as f64)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_text_form() {
        assert_eq!(Value::from(1).to_text().as_deref(), Some("1"));
        assert_eq!(Value::from(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(Value::from(-0.0).to_text().as_deref(), Some("0"));
        assert_eq!(Value::from(f64::NAN).to_text().as_deref(), Some("NaN"));
        assert_eq!(Value::from(f64::NEG_INFINITY).to_text().as_deref(), Some("-Infinity"));
        assert_eq!(Value::Null.to_text(), None);
    }

    #[test]
    fn test_extreme_numbers_use_exponent_form() {
        assert_eq!(Value::from(1e21).to_text().as_deref(), Some("1e+21"));
        assert_eq!(Value::from(-1.5e22).to_text().as_deref(), Some("-1.5e+22"));
        assert_eq!(Value::from(1e-7).to_text().as_deref(), Some("1e-7"));
        assert_eq!(Value::from(1e20).to_text().as_deref(), Some("100000000000000000000"));
        assert_eq!(Value::from(0.000001).to_text().as_deref(), Some("0.000001"));
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let row = crate::row! { "id" => 1 };
        assert_eq!(field_value(&row, "id"), &Value::Number(1.0));
        assert!(field_value(&row, "name").is_null());
    }

    #[test]
    fn test_rows_from_json_array() {
        let rows = rows_from_json(json!([
            { "id": 1, "name": "ann", "tags": ["a", "b"] },
            { "id": 2, "active": false, "note": null }
        ]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::from("ann"));
        assert_eq!(rows[0]["tags"], Value::from(r#"["a","b"]"#));
        assert_eq!(rows[1]["active"], Value::Bool(false));
        assert!(rows[1]["note"].is_null());
    }

    #[test]
    fn test_rows_from_json_degrades_silently() {
        assert!(rows_from_json(json!({ "id": 1 })).is_empty());

        let rows = rows_from_json(json!([1, { "id": 2 }]));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_empty());
    }

    #[test]
    fn test_row_preserves_field_order() {
        let rows = rows_from_json(json!([{ "z": 1, "a": 2, "m": 3 }]));
        let fields: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_key_same_value_zero() {
        assert_eq!(Key::from(0.0), Key::from(-0.0));
        assert_eq!(Key::from(f64::NAN), Key::from(f64::NAN));
        assert_eq!(Key::from(5), Key::from_value(&Value::from(5.0)).unwrap());
        assert_ne!(Key::from(5), Key::from("5"));
        assert_eq!(Key::from_value(&Value::Null), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::from(5).to_string(), "5");
        assert_eq!(Key::from("abc").to_string(), "abc");
        assert_eq!(Key::from(true).to_string(), "true");
    }
}
