//! Grid events and the derived state each one invalidates

use crate::model::{Key, Row};
use std::fmt;

/// Every state transition a grid accepts
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // Dataset
    // ─────────────────────────────────────────────────────────────────────────
    /// Replace the dataset
    Load(Vec<Row>),
    /// Recompute everything, replacing the dataset when rows are given
    Refresh(Option<Vec<Row>>),

    // ─────────────────────────────────────────────────────────────────────────
    // View
    // ─────────────────────────────────────────────────────────────────────────
    SetQuery(String),
    /// Header activation on a column
    ToggleSort(String),
    SetPageSize(usize),
    GotoPage(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    ToggleSelection(Key),
    /// Check or uncheck every keyed row on the current page
    SelectAllOnPage(bool),
    ClearSelection,
}

/// Derived state an event invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resets {
    /// Filter and sort must be rerun
    pub filtered_view: bool,
    /// Navigation returns to page one
    pub page: bool,
    /// The selection set is emptied
    pub selection: bool,
}

impl GridEvent {
    /// The reset table
    ///
    /// A query change invalidates selection, but sorting and page moves
    /// never do.
    pub fn resets(&self) -> Resets {
        match self {
            GridEvent::Load(_) | GridEvent::Refresh(_) | GridEvent::SetQuery(_) => Resets {
                filtered_view: true,
                page: true,
                selection: true,
            },
            GridEvent::ToggleSort(_) => Resets {
                filtered_view: true,
                page: false,
                selection: false,
            },
            GridEvent::SetPageSize(_) => Resets {
                filtered_view: false,
                page: true,
                selection: false,
            },
            GridEvent::GotoPage(_)
            | GridEvent::ToggleSelection(_)
            | GridEvent::SelectAllOnPage(_)
            | GridEvent::ClearSelection => Resets::default(),
        }
    }

    /// Whether the event is a direct selection edit
    pub fn edits_selection(&self) -> bool {
        matches!(
            self,
            GridEvent::ToggleSelection(_) | GridEvent::SelectAllOnPage(_) | GridEvent::ClearSelection
        )
    }
}

impl fmt::Display for GridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridEvent::Load(rows) => write!(f, "Load({} rows)", rows.len()),
            GridEvent::Refresh(Some(rows)) => write!(f, "Refresh({} rows)", rows.len()),
            GridEvent::Refresh(None) => write!(f, "Refresh"),
            GridEvent::SetQuery(query) => write!(f, "SetQuery({:?})", query),
            GridEvent::ToggleSort(field) => write!(f, "ToggleSort({})", field),
            GridEvent::SetPageSize(size) => write!(f, "SetPageSize({})", size),
            GridEvent::GotoPage(page) => write!(f, "GotoPage({})", page),
            GridEvent::ToggleSelection(key) => write!(f, "ToggleSelection({})", key),
            GridEvent::SelectAllOnPage(checked) => write!(f, "SelectAllOnPage({})", checked),
            GridEvent::ClearSelection => write!(f, "ClearSelection"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_table() {
        let query = GridEvent::SetQuery("a".to_string()).resets();
        assert!(query.filtered_view && query.page && query.selection);

        let sort = GridEvent::ToggleSort("name".to_string()).resets();
        assert!(sort.filtered_view);
        assert!(!sort.page && !sort.selection);

        let size = GridEvent::SetPageSize(25).resets();
        assert!(size.page && !size.selection && !size.filtered_view);

        assert_eq!(GridEvent::GotoPage(2).resets(), Resets::default());
        assert!(GridEvent::Refresh(None).resets().selection);
    }

    #[test]
    fn test_display() {
        assert_eq!(GridEvent::Load(vec![Row::new()]).to_string(), "Load(1 rows)");
        assert_eq!(GridEvent::SetQuery("an".to_string()).to_string(), "SetQuery(\"an\")");
        assert_eq!(GridEvent::ToggleSelection(Key::from(5)).to_string(), "ToggleSelection(5)");
    }
}
