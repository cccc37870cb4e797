//! gridview - a headless tabular view engine
//!
//! Given an in-memory dataset and a declarative column schema, the engine
//! derives the filtered, sorted, paginated and selected view of that data
//! that a presentation layer renders. It performs no I/O of its own.
//!
//! The pipeline is:
//! - [`engine::search`] - reduce the dataset to rows matching the query
//! - [`engine::sort`] - order the matches by a single field
//! - [`engine::paginate`] - slice the ordered matches into pages
//! - [`engine::selection`] - track selected row keys across all of the above
//! - [`engine::export`] - serialize the whole filtered view to CSV text
//!
//! [`GridState`] ties the pipeline together as a pure state-transition
//! function and [`Grid`] wraps it with observer callbacks.

pub mod engine;
pub mod error;
pub mod grid;
pub mod model;
pub mod options;

pub use engine::export::CsvExport;
pub use engine::paginate::{Goto, PageInfo, PageRange, Pagination};
pub use engine::selection::{PageSelection, SelectionSet};
pub use engine::sort::{SortDirection, SortIndicator, SortState};
pub use engine::transition::{GridEvent, Resets};
pub use error::GridError;
pub use grid::{Activation, Grid, GridState, PageView};
pub use model::{Cell, Column, ColumnSchema, Key, Renderable, Row, Value, ValueTransform};
pub use options::{GridOptions, PaginationOptions};

/// Build a [`Row`] from `field => value` pairs.
///
/// ```
/// let row = gridview::row! { "id" => 1, "name" => "ann", "active" => true };
/// assert_eq!(row.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $(row.insert(::std::string::String::from($field), $crate::Value::from($value));)+
        row
    }};
}
