//! Selection tracker - a set of row keys independent of filter, sort and page

use crate::model::{field_value, Key, Row};
use indexmap::IndexSet;

/// Key of `row` under `key_field`; rows without a key have no identity
pub fn row_key(row: &Row, key_field: Option<&str>) -> Option<Key> {
    key_field.and_then(|field| Key::from_value(field_value(row, field)))
}

/// How much of a page is selected, for a header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Some,
    All,
}

/// Selected row keys in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: IndexSet<Key>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `key`, returning whether it is now selected
    pub fn toggle(&mut self, key: Key) -> bool {
        if self.keys.shift_remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Selected keys, oldest selection first
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Add (`checked`) or remove the keys of exactly `page_rows`
    ///
    /// Rows without a key are skipped. Returns whether the set changed.
    pub fn select_all_on_page<'r>(
        &mut self,
        page_rows: impl IntoIterator<Item = &'r Row>,
        key_field: Option<&str>,
        checked: bool,
    ) -> bool {
        let mut changed = false;
        for key in page_rows.into_iter().filter_map(|row| row_key(row, key_field)) {
            changed |= if checked {
                self.keys.insert(key)
            } else {
                self.keys.shift_remove(&key)
            };
        }
        changed
    }

    pub fn is_row_selected(&self, row: &Row, key_field: Option<&str>) -> bool {
        row_key(row, key_field).is_some_and(|key| self.keys.contains(&key))
    }

    /// Rows of the live dataset whose key is selected, in dataset order
    pub fn selected_rows<'r>(&self, dataset: &'r [Row], key_field: Option<&str>) -> Vec<&'r Row> {
        if self.keys.is_empty() {
            return Vec::new();
        }
        dataset
            .iter()
            .filter(|row| self.is_row_selected(row, key_field))
            .collect()
    }

    /// Selection state of a page's keyed rows
    pub fn page_state<'r>(
        &self,
        page_rows: impl IntoIterator<Item = &'r Row>,
        key_field: Option<&str>,
    ) -> PageSelection {
        let (mut keyed, mut selected) = (0, 0);
        for key in page_rows.into_iter().filter_map(|row| row_key(row, key_field)) {
            keyed += 1;
            if self.keys.contains(&key) {
                selected += 1;
            }
        }

        if selected == 0 {
            PageSelection::None
        } else if selected == keyed {
            PageSelection::All
        } else {
            PageSelection::Some
        }
    }
}
