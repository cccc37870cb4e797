//! Grid options - behaviour switches and pagination defaults
//!
//! Options deserialize from YAML or JSON with every field optional.

use crate::error::GridError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Whether the search query can be changed at all
    pub searchable: bool,
    pub pagination: PaginationOptions,
    /// File name used when an export does not name one
    pub export_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// Rows per page on load
    pub page_size: usize,
    /// Page sizes a host offers for selection
    pub page_sizes: Vec<usize>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            searchable: true,
            pagination: PaginationOptions::default(),
            export_file_name: "grid.csv".to_string(),
        }
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_sizes: vec![10, 25, 50, 100],
        }
    }
}

impl GridOptions {
    pub fn validate(&self) -> Result<(), GridError> {
        self.pagination.validate()
    }
}

impl PaginationOptions {
    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPagination(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.page_sizes.is_empty() {
            return Err(GridError::InvalidPagination(
                "page_sizes must list at least one size".to_string(),
            ));
        }
        if self.page_sizes.contains(&0) {
            return Err(GridError::InvalidPagination(
                "page_sizes must not contain 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The next larger offered size, staying put at the largest
    pub fn next_size(&self, current: usize) -> usize {
        self.page_sizes
            .iter()
            .copied()
            .filter(|&size| size > current)
            .min()
            .unwrap_or(current)
    }

    /// The next smaller offered size, staying put at the smallest
    pub fn previous_size(&self, current: usize) -> usize {
        self.page_sizes
            .iter()
            .copied()
            .filter(|&size| size < current)
            .max()
            .unwrap_or(current)
    }
}
