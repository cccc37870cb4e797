//! Grid state - the pipeline as a pure state-transition function
//!
//! [`GridState::reduce`] takes an event and returns the next state record;
//! [`GridState::view`] derives the page a presentation layer draws.
//! [`Grid`] is the mutable handle most callers want: it holds the current
//! state and the observer callbacks, and forwards each public operation as
//! a [`GridEvent`].

use crate::engine::export::{self, CsvExport};
use crate::engine::paginate::{self, Goto, PageInfo, Pagination};
use crate::engine::search;
use crate::engine::selection::{PageSelection, SelectionSet};
use crate::engine::sort::{self, SortIndicator, SortState};
use crate::engine::transition::GridEvent;
use crate::error::GridError;
use crate::model::{Cell, Column, ColumnSchema, Key, Row};
use crate::options::GridOptions;
use log::debug;
use std::fmt;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Grid State
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable snapshot of everything a grid knows
///
/// Dataset, schema and the filtered view are shared, so cloning a state to
/// produce the next one is cheap.
#[derive(Debug, Clone)]
pub struct GridState {
    schema: Arc<ColumnSchema>,
    options: Arc<GridOptions>,
    dataset: Arc<[Row]>,
    query: String,
    sort: SortState,
    pagination: Pagination,
    selection: SelectionSet,
    /// Dataset positions of the filtered view, in display order
    filtered: Arc<[usize]>,
}

impl GridState {
    pub fn new(schema: ColumnSchema, rows: Vec<Row>, options: GridOptions) -> Result<Self, GridError> {
        options.validate()?;
        let pagination = Pagination::new(options.pagination.page_size);

        let mut state = Self {
            schema: Arc::new(schema),
            options: Arc::new(options),
            dataset: rows.into(),
            query: String::new(),
            sort: SortState::Unsorted,
            pagination,
            selection: SelectionSet::new(),
            filtered: Arc::from(Vec::new()),
        };
        state.filtered = state.compute_filtered();
        Ok(state)
    }

    fn compute_filtered(&self) -> Arc<[usize]> {
        let mut indices = search::matching_indices(&self.query, &self.dataset, self.schema.columns());
        sort::sort_indices(&mut indices, &self.dataset, &self.sort);
        indices.into()
    }

    /// The state after `event`
    ///
    /// Events that cannot apply (a query on a grid without search, sorting a
    /// column that is not sortable, selecting without a key field) return an
    /// unchanged copy.
    pub fn reduce(&self, event: GridEvent) -> GridState {
        let resets = event.resets();
        let mut next = self.clone();

        match event {
            GridEvent::Load(rows) => next.dataset = rows.into(),
            GridEvent::Refresh(rows) => {
                if let Some(rows) = rows {
                    next.dataset = rows.into();
                }
            }
            GridEvent::SetQuery(query) => {
                if !self.options.searchable {
                    debug!("search is disabled, ignoring query {:?}", query);
                    return next;
                }
                next.query = query;
            }
            GridEvent::ToggleSort(field) => {
                if !self.schema.column(&field).is_some_and(|c| c.sortable) {
                    debug!("column {:?} is not sortable", field);
                    return next;
                }
                next.sort = sort::toggle(&self.sort, &field);
            }
            GridEvent::SetPageSize(size) => next.pagination = self.pagination.with_page_size(size),
            GridEvent::GotoPage(page) => {
                next.pagination.goto(page, self.filtered.len());
            }
            GridEvent::ToggleSelection(key) => {
                if self.key_field().is_some() {
                    next.selection.toggle(key);
                }
            }
            GridEvent::SelectAllOnPage(checked) => {
                next.selection
                    .select_all_on_page(self.page_rows(), self.key_field(), checked);
            }
            GridEvent::ClearSelection => next.selection.clear(),
        }

        if resets.filtered_view {
            next.filtered = next.compute_filtered();
        }
        if resets.page {
            next.pagination.reset();
        }
        if resets.selection {
            next.selection.clear();
        }
        next.pagination.clamp(next.filtered.len());
        next
    }

    pub fn dataset(&self) -> &[Row] {
        &self.dataset
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        self.schema.columns()
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn key_field(&self) -> Option<&str> {
        self.schema.selection_key_field()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The whole filtered view, across all pages
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.filtered.iter().map(|&i| &self.dataset[i]).collect()
    }

    /// Rows of the current page
    pub fn page_rows(&self) -> Vec<&Row> {
        self.pagination
            .slice(&self.filtered)
            .iter()
            .map(|&i| &self.dataset[i])
            .collect()
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info(self.filtered.len())
    }

    pub fn view(&self) -> PageView<'_> {
        PageView {
            rows: self.page_rows(),
            info: self.page_info(),
            state: self,
        }
    }

    /// Selected keys in the order they were selected
    pub fn selected_keys(&self) -> Vec<Key> {
        self.selection.keys().cloned().collect()
    }

    /// Selected rows of the live dataset, including rows filtered out
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selection.selected_rows(&self.dataset, self.key_field())
    }

    /// Serialize the filtered view; `file_name` defaults to the configured one
    pub fn export(&self, file_name: Option<&str>) -> CsvExport {
        let rows = self.filtered_rows();
        CsvExport {
            file_name: file_name
                .unwrap_or(&self.options.export_file_name)
                .to_string(),
            contents: export::export(self.columns(), rows.iter().copied()),
            row_count: rows.len(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Page View
// ═══════════════════════════════════════════════════════════════════════════════

/// One derived page and the metadata needed to draw it
#[derive(Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Row>,
    pub info: PageInfo,
    state: &'a GridState,
}

impl<'a> PageView<'a> {
    /// No rows to show; presentation layers draw a "No data" placeholder
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &'a [Column] {
        self.state.columns()
    }

    pub fn sort_indicator(&self, field: &str) -> SortIndicator {
        self.state.sort.indicator(field)
    }

    pub fn selection_enabled(&self) -> bool {
        self.state.key_field().is_some()
    }

    pub fn is_selected(&self, row: &Row) -> bool {
        self.state.selection.is_row_selected(row, self.state.key_field())
    }

    /// Checkbox state for a "select all on page" header
    pub fn selection_state(&self) -> PageSelection {
        self.state
            .selection
            .page_state(self.rows.iter().copied(), self.state.key_field())
    }

    /// Resolved cells of `row`, one per column
    pub fn cells(&self, row: &Row) -> Vec<Cell> {
        let selected = self.is_selected(row);
        self.columns().iter().map(|c| c.cell(row, selected)).collect()
    }

    pub fn query(&self) -> &'a str {
        &self.state.query
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Grid
// ═══════════════════════════════════════════════════════════════════════════════

/// How a row was activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Single,
    Double,
}

type RowObserver = Box<dyn FnMut(&Row)>;
type SelectionObserver = Box<dyn FnMut(&[&Row])>;

#[derive(Default)]
struct Observers {
    row_click: Option<RowObserver>,
    row_double_click: Option<RowObserver>,
    selection_change: Option<SelectionObserver>,
}

/// A grid instance: current state plus observers
///
/// Not thread-safe; callers in concurrent settings serialize access.
pub struct Grid {
    state: GridState,
    observers: Observers,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid").field("state", &self.state).finish_non_exhaustive()
    }
}

impl Grid {
    /// Build a grid, validating the column schema and options
    pub fn new(columns: Vec<Column>, rows: Vec<Row>, options: GridOptions) -> Result<Self, GridError> {
        let schema = ColumnSchema::new(columns)?;
        Ok(Self {
            state: GridState::new(schema, rows, options)?,
            observers: Observers::default(),
        })
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn view(&self) -> PageView<'_> {
        self.state.view()
    }

    /// Apply `event` and return the new page
    ///
    /// Direct selection edits that change the set notify the selection
    /// observer with the resolved rows.
    pub fn dispatch(&mut self, event: GridEvent) -> PageView<'_> {
        debug!("grid event: {}", event);
        let edits_selection = event.edits_selection();
        let next = self.state.reduce(event);
        let selection_changed = next.selection != self.state.selection;
        self.state = next;

        if edits_selection && selection_changed {
            if let Some(observer) = self.observers.selection_change.as_mut() {
                let rows = self.state.selected_rows();
                observer(rows.as_slice());
            }
        }
        self.state.view()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dataset
    // ─────────────────────────────────────────────────────────────────────────

    pub fn load(&mut self, rows: Vec<Row>) -> PageView<'_> {
        self.dispatch(GridEvent::Load(rows))
    }

    /// Recompute the view, replacing the dataset when `rows` is given
    pub fn refresh(&mut self, rows: Option<Vec<Row>>) -> PageView<'_> {
        self.dispatch(GridEvent::Refresh(rows))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_query(&mut self, query: impl Into<String>) -> PageView<'_> {
        self.dispatch(GridEvent::SetQuery(query.into()))
    }

    pub fn toggle_sort(&mut self, field: &str) -> PageView<'_> {
        self.dispatch(GridEvent::ToggleSort(field.to_string()))
    }

    pub fn set_page_size(&mut self, page_size: usize) -> PageView<'_> {
        self.dispatch(GridEvent::SetPageSize(page_size))
    }

    /// Move to `page`, clamped into range
    ///
    /// Returns `None` when the clamped page is the current one, meaning
    /// there is nothing new to render.
    pub fn goto_page(&mut self, page: usize) -> Option<PageView<'_>> {
        let info = self.state.page_info();
        match paginate::goto(page, info.current_page, info.total_pages) {
            Goto::Unchanged(_) => None,
            Goto::Moved(target) => Some(self.dispatch(GridEvent::GotoPage(target))),
        }
    }

    pub fn first_page(&mut self) -> Option<PageView<'_>> {
        self.goto_page(1)
    }

    pub fn previous_page(&mut self) -> Option<PageView<'_>> {
        let current = self.state.pagination.current_page();
        self.goto_page(current.saturating_sub(1))
    }

    pub fn next_page(&mut self) -> Option<PageView<'_>> {
        let current = self.state.pagination.current_page();
        self.goto_page(current.saturating_add(1))
    }

    pub fn last_page(&mut self) -> Option<PageView<'_>> {
        let total = self.state.page_info().total_pages;
        self.goto_page(total)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_selection(&mut self, key: impl Into<Key>) -> PageView<'_> {
        self.dispatch(GridEvent::ToggleSelection(key.into()))
    }

    pub fn select_all_on_page(&mut self, checked: bool) -> PageView<'_> {
        self.dispatch(GridEvent::SelectAllOnPage(checked))
    }

    pub fn clear_selection(&mut self) -> PageView<'_> {
        self.dispatch(GridEvent::ClearSelection)
    }

    pub fn selected_keys(&self) -> Vec<Key> {
        self.state.selected_keys()
    }

    pub fn selected_rows(&self) -> Vec<&Row> {
        self.state.selected_rows()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    pub fn export_csv(&self, file_name: Option<&str>) -> CsvExport {
        let export = self.state.export(file_name);
        debug!("exported {} rows as {}", export.row_count, export.file_name);
        export
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn on_row_click(&mut self, observer: impl FnMut(&Row) + 'static) {
        self.observers.row_click = Some(Box::new(observer));
    }

    pub fn on_row_double_click(&mut self, observer: impl FnMut(&Row) + 'static) {
        self.observers.row_double_click = Some(Box::new(observer));
    }

    pub fn on_selection_change(&mut self, observer: impl FnMut(&[&Row]) + 'static) {
        self.observers.selection_change = Some(Box::new(observer));
    }

    /// Activate the row at `page_index` on the current page
    ///
    /// Returns whether such a row exists.
    pub fn activate_row(&mut self, page_index: usize, activation: Activation) -> bool {
        let page = self.state.page_rows();
        let Some(row) = page.get(page_index).copied() else {
            return false;
        };

        let observer = match activation {
            Activation::Single => self.observers.row_click.as_mut(),
            Activation::Double => self.observers.row_double_click.as_mut(),
        };
        if let Some(observer) = observer {
            observer(row);
        }
        true
    }
}
