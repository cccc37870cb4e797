//! Root application component
//!
//! The App owns the grid and applies Actions to it. Components only map
//! keys and draw; grid observers report back through a shared notice queue
//! the App drains after every update.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, centered_popup, render_pager, GridTable, HelpDialog, QuitDialog};
use crate::config::Config;
use crate::modal::{Modal, ModalStack};
use crate::reveal::{RevealGate, REFRESH_DELAY, START_DELAY};
use crate::services::{self, GridDefinition};
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use gridview::engine::selection::row_key;
use gridview::{Grid, Row, Value};
use log::{debug, info, warn};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// Observer Notices
// ═══════════════════════════════════════════════════════════════════════════════

/// What the grid observers saw since the last update
#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Clicked(String),
    Opened(Row),
    SelectionChanged(usize),
}

type Notices = Rc<RefCell<Vec<Notice>>>;

/// Short label for a row: its first non-null value
fn describe_row(row: &Row) -> String {
    row.values()
        .find(|v| !v.is_null())
        .map(Value::to_string)
        .unwrap_or_else(|| "(empty)".to_string())
}

fn watch(grid: &mut Grid, notices: &Notices) {
    let sink = Rc::clone(notices);
    grid.on_row_click(move |row: &Row| {
        sink.borrow_mut().push(Notice::Clicked(describe_row(row)));
    });

    let sink = Rc::clone(notices);
    grid.on_row_double_click(move |row: &Row| {
        sink.borrow_mut().push(Notice::Opened(row.clone()));
    });

    let sink = Rc::clone(notices);
    grid.on_selection_change(move |rows: &[&Row]| {
        sink.borrow_mut().push(Notice::SelectionChanged(rows.len()));
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    pub grid: Grid,

    /// Dataset file, reloaded on refresh
    pub data_path: PathBuf,

    /// Rows waiting out the reveal delay
    pub reveal: RevealGate<Vec<Row>>,

    pub modals: ModalStack,

    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Whether keys currently edit the search query
    pub search_mode: bool,
    pub search_query: String,

    notices: Notices,

    /// Persisted settings
    pub config: Config,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub table: GridTable,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Build the grid and stage `rows` for the initial reveal
    pub fn new(
        data_path: PathBuf,
        definition: GridDefinition,
        rows: Vec<Row>,
        config: Config,
    ) -> Result<App> {
        let mut grid = Grid::new(definition.columns, Vec::new(), definition.options)
            .context("Invalid grid definition")?;

        let notices = Notices::default();
        watch(&mut grid, &notices);

        let mut reveal = RevealGate::new();
        reveal.arm(rows, START_DELAY, Instant::now());

        Ok(App {
            grid,
            data_path,
            reveal,
            modals: ModalStack::new(),
            should_quit: false,
            error: None,
            status_message: None,
            search_mode: false,
            search_query: String::new(),
            notices,
            config,
            table: GridTable::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
        })
    }

    /// Reveal staged rows whose delay has passed
    fn poll_reveal(&mut self) {
        if let Some(rows) = self.reveal.poll(Instant::now()) {
            let count = rows.len();
            self.grid.load(rows);
            self.table.row_cursor = 0;
            debug!("revealed {} rows", count);
        }
    }

    fn refresh(&mut self) {
        match services::load_rows(&self.data_path) {
            Ok(rows) => {
                let generation = self.reveal.arm(rows, REFRESH_DELAY, Instant::now());
                debug!("staged refresh generation {}", generation);
                self.status_message = Some("Reloading…".to_string());
            }
            Err(e) => {
                warn!("refresh failed: {:#}", e);
                self.error = Some(format!("{:#}", e));
            }
        }
    }

    fn export(&mut self) -> Result<()> {
        let export = self.grid.export_csv(None);
        let dir = self.config.export_dir();
        let path = dir.join(&export.file_name);

        fs::write(&path, &export.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("exported {} rows to {}", export.row_count, path.display());

        self.config.last_export_dir = Some(dir);
        if let Err(e) = self.config.save() {
            warn!("could not save settings: {:#}", e);
        }

        self.status_message = Some(format!(
            "{} exported {} rows to {}",
            Local::now().format("%H:%M:%S"),
            export.row_count,
            path.display()
        ));
        Ok(())
    }

    fn toggle_sort_under_cursor(&mut self) {
        let column = self
            .grid
            .state()
            .columns()
            .get(self.table.column_cursor)
            .map(|c| (c.field.clone(), c.sortable));

        match column {
            Some((field, true)) => {
                self.grid.toggle_sort(&field);
            }
            Some((field, false)) => {
                self.status_message = Some(format!("Column '{}' is not sortable", field));
            }
            None => {}
        }
    }

    fn toggle_row_under_cursor(&mut self) {
        let state = self.grid.state();
        if state.key_field().is_none() {
            self.status_message = Some("Selection is not enabled for this grid".to_string());
            return;
        }

        let key = state
            .page_rows()
            .get(self.table.row_cursor)
            .and_then(|row| row_key(row, state.key_field()));
        match key {
            Some(key) => {
                self.grid.toggle_selection(key);
            }
            None => self.status_message = Some("This row has no key to select by".to_string()),
        }
    }

    fn step_page_size(&mut self, grow: bool) {
        let state = self.grid.state();
        let current = state.pagination().page_size();
        let pagination = &state.options().pagination;
        let next = if grow {
            pagination.next_size(current)
        } else {
            pagination.previous_size(current)
        };

        if next != current {
            self.grid.set_page_size(next);
            self.table.row_cursor = 0;
        }
    }

    fn set_query(&mut self) {
        self.grid.set_query(self.search_query.clone());
        self.table.row_cursor = 0;
    }

    fn drain_notices(&mut self) {
        let notices: Vec<Notice> = self.notices.borrow_mut().drain(..).collect();
        for notice in notices {
            match notice {
                Notice::Clicked(label) => self.status_message = Some(format!("Row {}", label)),
                Notice::Opened(row) => self.modals.push(Modal::RowDetail(row)),
                Notice::SelectionChanged(count) => {
                    self.status_message = Some(format!("{} rows selected", count));
                }
            }
        }
    }

    fn table_title(&self) -> String {
        let name = self
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "data".to_string());
        let state = self.grid.state();

        let selected = state.selection().len();
        if selected > 0 {
            format!(" {} ({}) [{}✓] ", name, state.filtered_len(), selected)
        } else {
            format!(" {} ({}) ", name, state.filtered_len())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        let state = self.grid.state();
        self.table
            .set_columns(state.columns(), state.pagination().page_size());
        info!(
            "showing {} with {} columns",
            self.data_path.display(),
            state.columns().len()
        );
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        self.error = None;
        if self.search_mode {
            self.handle_search_key_event(key)
        } else {
            self.table.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            debug!("action: {}", action);
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.poll_reveal(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Cursor
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow | Action::PrevRow | Action::NextColumn | Action::PrevColumn => {
                self.table.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Paging
            // ─────────────────────────────────────────────────────────────────
            Action::NextPage | Action::PrevPage | Action::FirstPage | Action::LastPage => {
                let moved = match action {
                    Action::NextPage => self.grid.next_page().is_some(),
                    Action::PrevPage => self.grid.previous_page().is_some(),
                    Action::FirstPage => self.grid.first_page().is_some(),
                    _ => self.grid.last_page().is_some(),
                };
                if moved {
                    self.table.update(action)?;
                }
            }
            Action::GrowPageSize => self.step_page_size(true),
            Action::ShrinkPageSize => self.step_page_size(false),

            Action::ToggleSort => self.toggle_sort_under_cursor(),

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => {
                if self.grid.state().options().searchable {
                    self.search_mode = true;
                } else {
                    self.status_message = Some("Search is disabled for this grid".to_string());
                }
            }
            Action::ExitSearchMode => self.search_mode = false,
            Action::SearchInput(c) => {
                self.search_query.push(c);
                self.set_query();
            }
            Action::SearchBackspace => {
                if self.search_query.pop().is_some() {
                    self.set_query();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Selection
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleRowSelection => self.toggle_row_under_cursor(),
            Action::SelectPage => {
                self.grid.select_all_on_page(true);
            }
            Action::DeselectPage => {
                self.grid.select_all_on_page(false);
            }
            Action::ClearSelection => {
                self.grid.clear_selection();
            }

            Action::ActivateRow => {
                let activation = self.table.activation(Instant::now());
                self.grid.activate_row(self.table.row_cursor, activation);
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::Refresh => self.refresh(),
            Action::Export => {
                if let Err(e) = self.export() {
                    warn!("export failed: {:#}", e);
                    self.error = Some(format!("{:#}", e));
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.selected = self.grid.state().selection().len();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => self.modals.push(Modal::Help),
            Action::CloseModal => {
                self.modals.pop();
                self.help_dialog.update(Action::CloseModal)?;
            }
        }

        self.drain_notices();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let has_status = self.error.is_some() || self.status_message.is_some();
        let layout = calculate_main_layout(area, has_status);

        self.draw_search_bar(frame, layout.search);

        if self.reveal.is_armed() {
            self.table.draw(frame, layout.table)?;
        } else {
            let title = self.table_title();
            let view = self.grid.view();
            self.table.draw_page(frame, layout.table, &view, &title);
        }

        render_pager(frame, layout.pager, &self.grid.state().page_info());

        if let Some(status_area) = layout.status {
            self.draw_status(frame, status_area);
        }
        self.draw_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::RowDetail(_) => {
                let action = match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseModal),
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::RowDetail(row) => draw_row_detail(frame, area, row),
        }
        Ok(())
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if self.search_mode {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::styled(
                    format!(" {}█", self.search_query),
                    Style::default().fg(Color::Cyan),
                ),
            ])
        } else if !self.search_query.is_empty() {
            Line::from(vec![
                Span::styled(" / ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!(" {}", self.search_query),
                    Style::default().fg(Color::White),
                ),
            ])
        } else if self.grid.state().options().searchable {
            Line::from(Span::styled(
                " Press / to search",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let span = if let Some(error) = &self.error {
            Span::styled(format!(" Error: {} ", error), Style::default().fg(Color::Red))
        } else if let Some(status) = &self.status_message {
            Span::styled(format!(" {} ", status), Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        };
        frame.render_widget(Paragraph::new(Line::from(span)), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |label: &'static str, color: Color| {
            Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        };

        let spans = if self.search_mode {
            vec![
                key(" Esc/Enter ", Color::Yellow),
                Span::raw("Done  "),
                key(" Backspace ", Color::Yellow),
                Span::raw("Delete"),
            ]
        } else {
            vec![
                key(" q ", Color::Yellow),
                Span::raw("Quit "),
                key(" / ", Color::Cyan),
                Span::raw("Search "),
                key(" s ", Color::Cyan),
                Span::raw("Sort "),
                key(" n/p ", Color::Cyan),
                Span::raw("Page "),
                key(" Space ", Color::Green),
                Span::raw("Select "),
                key(" e ", Color::Magenta),
                Span::raw("Export "),
                key(" r ", Color::Magenta),
                Span::raw("Reload "),
                key(" ? ", Color::White),
                Span::raw("Help"),
            ]
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn draw_row_detail(frame: &mut Frame, area: Rect, row: &Row) {
    let height = (row.len() as u16).saturating_add(4);
    let popup_area = centered_popup(area, 60, height);
    frame.render_widget(Clear, popup_area);

    let field_width = row.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut lines = vec![Line::from("")];
    for (field, value) in row {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:width$}  ", field, width = field_width),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Row ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridview::{row, Column, GridOptions, Key};

    fn definition() -> GridDefinition {
        GridDefinition {
            columns: vec![
                Column::new("id").checkbox_selection(),
                Column::new("name").sortable(),
                Column::new("city"),
            ],
            options: GridOptions::default(),
        }
    }

    fn rows(count: usize) -> Vec<Row> {
        (1..=count)
            .map(|i| row! { "id" => i, "name" => format!("name{}", i), "city" => "Oslo" })
            .collect()
    }

    /// An app whose staged rows are already revealed
    fn app(count: usize) -> App {
        let mut app = App::new(PathBuf::from("people.json"), definition(), Vec::new(), Config::default())
            .unwrap();
        app.reveal = RevealGate::new();
        app.grid.load(rows(count));
        app
    }

    #[test]
    fn test_rows_are_staged_until_revealed() {
        let mut app = App::new(PathBuf::from("people.json"), definition(), rows(3), Config::default())
            .unwrap();
        assert!(app.reveal.is_armed());
        assert!(app.grid.view().is_empty());

        app.update(Action::Tick).unwrap();
        assert!(app.reveal.is_armed());
    }

    #[test]
    fn test_describe_row() {
        assert_eq!(describe_row(&row! { "a" => Option::<i32>::None, "b" => "x" }), "x");
        assert_eq!(describe_row(&Row::new()), "(empty)");
    }

    #[test]
    fn test_search_input_filters_and_resets_cursor() {
        let mut app = app(25);
        app.table.row_cursor = 4;

        app.update(Action::EnterSearchMode).unwrap();
        for c in "name2".chars() {
            app.update(Action::SearchInput(c)).unwrap();
        }
        assert_eq!(app.grid.state().filtered_len(), 7);
        assert_eq!(app.table.row_cursor, 0);

        app.update(Action::SearchBackspace).unwrap();
        assert_eq!(app.search_query, "name");
        assert_eq!(app.grid.state().filtered_len(), 25);
    }

    #[test]
    fn test_selection_reports_status() {
        let mut app = app(5);
        app.table.row_cursor = 2;

        app.update(Action::ToggleRowSelection).unwrap();
        assert_eq!(app.grid.selected_keys(), vec![Key::from(3)]);
        assert_eq!(app.status_message.as_deref(), Some("1 rows selected"));

        app.update(Action::SelectPage).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("5 rows selected"));
    }

    #[test]
    fn test_sort_refuses_unsortable_column() {
        let mut app = app(3);
        app.table.column_cursor = 2;
        app.update(Action::ToggleSort).unwrap();
        assert_eq!(
            app.status_message.as_deref(),
            Some("Column 'city' is not sortable")
        );

        app.table.column_cursor = 1;
        app.update(Action::ToggleSort).unwrap();
        assert_eq!(app.grid.state().sort().field(), Some("name"));
    }

    #[test]
    fn test_paging_and_page_size() {
        let mut app = app(25);
        app.table.row_cursor = 3;

        app.update(Action::NextPage).unwrap();
        assert_eq!(app.grid.state().pagination().current_page(), 2);
        assert_eq!(app.table.row_cursor, 0);

        app.update(Action::GrowPageSize).unwrap();
        assert_eq!(app.grid.state().pagination().page_size(), 25);
        assert_eq!(app.grid.state().pagination().current_page(), 1);

        app.update(Action::GrowPageSize).unwrap();
        app.update(Action::ShrinkPageSize).unwrap();
        assert_eq!(app.grid.state().pagination().page_size(), 25);
    }

    #[test]
    fn test_double_activation_opens_row_detail() {
        let mut app = app(3);
        app.table.row_cursor = 1;

        app.update(Action::ActivateRow).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("Row 2"));
        assert!(app.modals.is_empty());

        app.update(Action::ActivateRow).unwrap();
        assert!(matches!(app.modals.top(), Some(Modal::RowDetail(row)) if row["id"] == Value::from(2)));

        app.update(Action::CloseModal).unwrap();
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_quit_dialog_counts_selection() {
        let mut app = app(3);
        app.update(Action::SelectPage).unwrap();
        app.update(Action::OpenQuitDialog).unwrap();
        assert_eq!(app.quit_dialog.selected, 3);
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));

        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_failed_refresh_keeps_data() {
        let mut app = app(3);
        app.data_path = PathBuf::from("definitely/missing.csv");
        app.update(Action::Refresh).unwrap();

        assert!(app.error.is_some());
        assert!(!app.reveal.is_armed());
        assert_eq!(app.grid.state().filtered_len(), 3);
    }
}
