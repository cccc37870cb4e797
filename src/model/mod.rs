//! Data model - rows, values and the column schema
//!
//! - `Value` / `Row` - the opaque records the engine operates on
//! - `Key` - the hashable identity of a row for selection
//! - `Column` / `ColumnSchema` - the declarative description of the grid

pub mod column;
pub mod value;

pub use column::{Cell, Column, ColumnSchema, Renderable, ValueTransform};
pub use value::{field_value, rows_from_json, Key, Row, Value};
