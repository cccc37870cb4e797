//! Configuration errors
//!
//! The engine itself never fails on data: unknown fields read as null and
//! out-of-range requests clamp. Only schema and option validation can reject
//! input, and it does so when a grid is built.

use thiserror::Error;

/// Errors raised while validating a grid configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// More than one column claims to be the selection control
    #[error("more than one column is marked for checkbox selection: {}", .fields.join(", "))]
    MultipleSelectionColumns { fields: Vec<String> },

    /// Pagination options that cannot produce a page
    #[error("invalid pagination options: {0}")]
    InvalidPagination(String),
}
