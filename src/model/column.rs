//! Column schema and cell resolution

use crate::error::GridError;
use crate::model::value::{field_value, Row, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Output of a value transform, handed to the presentation layer untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderable {
    /// Plain text, shown as-is
    Text(String),
    /// Host-specific markup the engine never inspects
    Markup(String),
}

/// A caller-supplied hook turning a field value into something renderable
///
/// The engine invokes transforms but never interprets their output.
/// Any `Fn(&Value, &Row) -> Renderable` closure is a transform.
pub trait ValueTransform: Send + Sync {
    fn apply(&self, value: &Value, row: &Row) -> Renderable;
}

impl<F> ValueTransform for F
where
    F: Fn(&Value, &Row) -> Renderable + Send + Sync,
{
    fn apply(&self, value: &Value, row: &Row) -> Renderable {
        self(value, row)
    }
}

/// One rendered dimension of the grid
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Key into each row
    pub field: String,
    /// Header text; falls back to `field`
    pub label: Option<String>,
    /// Whether header activation toggles sorting on this field
    pub sortable: bool,
    /// Restricts search to the columns that set it
    pub filter: bool,
    /// Marks the selection control; its field becomes the selection key
    #[serde(alias = "checkboxSelection")]
    pub checkbox_selection: bool,
    /// Layout hint, ignored by the engine
    pub width: Option<u16>,
    #[serde(skip)]
    pub render: Option<Arc<dyn ValueTransform>>,
    #[serde(skip)]
    pub value_formatter: Option<Arc<dyn ValueTransform>>,
    #[serde(skip)]
    pub icon: Option<Arc<dyn ValueTransform>>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filter", &self.filter)
            .field("checkbox_selection", &self.checkbox_selection)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .field("value_formatter", &self.value_formatter.is_some())
            .field("icon", &self.icon.is_some())
            .finish()
    }
}

/// What a presentation layer should draw in one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// The selection control for this row
    SelectionBox { checked: bool },
    /// Output of a caller-supplied transform
    Rendered(Renderable),
    /// A boolean value, shown as a read-only checkbox
    Flag(bool),
    /// Default text; empty for null
    Text(String),
}

impl Column {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filter(mut self) -> Self {
        self.filter = true;
        self
    }

    pub fn checkbox_selection(mut self) -> Self {
        self.checkbox_selection = true;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(mut self, transform: impl ValueTransform + 'static) -> Self {
        self.render = Some(Arc::new(transform));
        self
    }

    pub fn value_formatter(mut self, transform: impl ValueTransform + 'static) -> Self {
        self.value_formatter = Some(Arc::new(transform));
        self
    }

    pub fn icon(mut self, transform: impl ValueTransform + 'static) -> Self {
        self.icon = Some(Arc::new(transform));
        self
    }

    /// Header text: the label when it is non-empty, otherwise the field name
    pub fn header(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.field,
        }
    }

    /// Resolve what to draw for `row` in this column
    ///
    /// The selection column always yields its checkbox. Otherwise the first
    /// configured transform wins, in the order render, value formatter,
    /// icon. Untransformed booleans become flags and everything else text.
    pub fn cell(&self, row: &Row, selected: bool) -> Cell {
        if self.checkbox_selection {
            return Cell::SelectionBox { checked: selected };
        }

        let value = field_value(row, &self.field);
        let transform = self
            .render
            .as_ref()
            .or(self.value_formatter.as_ref())
            .or(self.icon.as_ref());
        if let Some(transform) = transform {
            return Cell::Rendered(transform.apply(value, row));
        }

        match value {
            Value::Bool(b) => Cell::Flag(*b),
            other => Cell::Text(other.to_string()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Column Schema
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated list of columns
#[derive(Debug, Clone, Default)]
pub struct ColumnSchema {
    columns: Vec<Column>,
    selection_key: Option<String>,
}

impl ColumnSchema {
    /// Validate `columns` and infer the selection key field
    ///
    /// At most one column may be marked `checkbox_selection`. With none,
    /// selection is disabled and every selection operation is a no-op.
    pub fn new(columns: Vec<Column>) -> Result<Self, GridError> {
        let selection_fields: Vec<String> = columns
            .iter()
            .filter(|c| c.checkbox_selection)
            .map(|c| c.field.clone())
            .collect();

        if selection_fields.len() > 1 {
            return Err(GridError::MultipleSelectionColumns {
                fields: selection_fields,
            });
        }

        Ok(Self {
            columns,
            selection_key: selection_fields.into_iter().next(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Field whose value identifies a row for selection
    pub fn selection_key_field(&self) -> Option<&str> {
        self.selection_key.as_deref()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
