//! Grid table component
//!
//! Draws one page of the grid with a row cursor and a column cursor, plus
//! skeleton rows while a load is being revealed and the pager line below.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gridview::{Activation, Cell, Column, PageInfo, PageSelection, PageView, Renderable};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Two activations of the same row within this window count as a double
const DOUBLE_ACTIVATION_WINDOW: Duration = Duration::from_millis(400);
const MAX_COLUMN_WIDTH: usize = 40;
const SELECTION_WIDTH: usize = 3;
const SEPARATOR: &str = " │ ";

pub struct GridTable {
    pub row_cursor: usize,
    pub column_cursor: usize,
    /// Header and width of each column, for skeleton rows
    skeleton: Vec<(String, usize)>,
    skeleton_rows: usize,
    last_activation: Option<(usize, Instant)>,
}

impl Default for GridTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GridTable {
    pub fn new() -> Self {
        Self {
            row_cursor: 0,
            column_cursor: 0,
            skeleton: Vec::new(),
            skeleton_rows: 10,
            last_activation: None,
        }
    }

    /// Remember the column layout used for skeleton rows
    pub fn set_columns(&mut self, columns: &[Column], page_size: usize) {
        self.skeleton = columns
            .iter()
            .map(|c| {
                let width = if c.checkbox_selection {
                    SELECTION_WIDTH
                } else {
                    c.width
                        .map(usize::from)
                        .unwrap_or_else(|| c.header().width().max(8))
                };
                (c.header().to_string(), width)
            })
            .collect();
        self.skeleton_rows = page_size;
    }

    /// Keep both cursors inside the current page
    pub fn clamp(&mut self, rows_on_page: usize, columns: usize) {
        self.row_cursor = self.row_cursor.min(rows_on_page.saturating_sub(1));
        self.column_cursor = self.column_cursor.min(columns.saturating_sub(1));
    }

    /// Classify an activation of the row under the cursor
    pub fn activation(&mut self, now: Instant) -> Activation {
        let double = self.last_activation.is_some_and(|(row, at)| {
            row == self.row_cursor && now.saturating_duration_since(at) <= DOUBLE_ACTIVATION_WINDOW
        });

        if double {
            self.last_activation = None;
            Activation::Double
        } else {
            self.last_activation = Some((self.row_cursor, now));
            Activation::Single
        }
    }

    pub fn draw_page(&mut self, frame: &mut Frame, area: Rect, view: &PageView, title: &str) {
        let columns = view.columns();
        self.clamp(view.rows.len(), columns.len());

        let resolved: Vec<Vec<Cell>> = view.rows.iter().map(|row| view.cells(row)).collect();
        let widths = column_widths(columns, &resolved);

        let mut lines = vec![self.header_line(view, &widths), separator_line(&widths)];

        if view.is_empty() {
            lines.push(Line::from(""));
            lines.push(
                Line::from(Span::styled("No data", Style::default().fg(Color::DarkGray)))
                    .alignment(Alignment::Center),
            );
        }

        for (index, (row, cells)) in view.rows.iter().zip(&resolved).enumerate() {
            let selected = view.is_selected(row);
            let mut line = Line::from(row_spans(cells, &widths, selected));
            if index == self.row_cursor {
                line = line.style(
                    Style::default()
                        .bg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                );
            }
            lines.push(line);
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
    }

    fn header_line(&self, view: &PageView, widths: &[usize]) -> Line<'static> {
        let spans = view
            .columns()
            .iter()
            .zip(widths)
            .enumerate()
            .flat_map(|(index, (column, &width))| {
                let text = if column.checkbox_selection {
                    match view.selection_state() {
                        PageSelection::All => "[x]".to_string(),
                        PageSelection::Some => "[-]".to_string(),
                        PageSelection::None => "[ ]".to_string(),
                    }
                } else {
                    header_text(column, view.sort_indicator(&column.field).symbol())
                };

                let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if index == self.column_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                vec![Span::styled(fit(&text, width), style), Span::raw(SEPARATOR)]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl Component for GridTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextColumn),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevColumn),
            KeyCode::Char('s') => Some(Action::ToggleSort),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('+') => Some(Action::GrowPageSize),
            KeyCode::Char('-') => Some(Action::ShrinkPageSize),
            KeyCode::Char(' ') => Some(Action::ToggleRowSelection),
            KeyCode::Char('a') => Some(Action::SelectPage),
            KeyCode::Char('A') => Some(Action::DeselectPage),
            KeyCode::Esc => Some(Action::ClearSelection),
            KeyCode::Enter => Some(Action::ActivateRow),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextRow => self.row_cursor = self.row_cursor.saturating_add(1),
            Action::PrevRow => self.row_cursor = self.row_cursor.saturating_sub(1),
            Action::NextColumn => self.column_cursor = self.column_cursor.saturating_add(1),
            Action::PrevColumn => self.column_cursor = self.column_cursor.saturating_sub(1),
            // a new page starts at its first row
            Action::NextPage | Action::PrevPage | Action::FirstPage | Action::LastPage => {
                self.row_cursor = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    /// Skeleton rows shown until the staged dataset is revealed
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let widths: Vec<usize> = self.skeleton.iter().map(|(_, w)| *w).collect();
        let header = self
            .skeleton
            .iter()
            .flat_map(|(title, width)| {
                vec![
                    Span::styled(
                        fit(title, *width),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(SEPARATOR),
                ]
            })
            .collect::<Vec<_>>();

        let visible = usize::from(area.height.saturating_sub(4));
        let mut lines = vec![Line::from(header), separator_line(&widths)];
        for _ in 0..self.skeleton_rows.min(visible) {
            let spans = widths
                .iter()
                .flat_map(|w| {
                    vec![
                        Span::styled("░".repeat(*w), Style::default().fg(Color::DarkGray)),
                        Span::raw(SEPARATOR),
                    ]
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(spans));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Loading… ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn header_text(column: &Column, indicator: &str) -> String {
    if indicator.is_empty() {
        column.header().to_string()
    } else {
        format!("{} {}", column.header(), indicator)
    }
}

/// Display text and style of a resolved cell
fn cell_text(cell: &Cell) -> (String, Style) {
    match cell {
        Cell::SelectionBox { checked: true } => ("[x]".to_string(), Style::default().fg(Color::Green)),
        Cell::SelectionBox { checked: false } => ("[ ]".to_string(), Style::default()),
        Cell::Rendered(Renderable::Text(text)) => (text.clone(), Style::default().fg(Color::White)),
        Cell::Rendered(Renderable::Markup(markup)) => {
            (markup.clone(), Style::default().fg(Color::Magenta))
        }
        Cell::Flag(true) => ("✓".to_string(), Style::default().fg(Color::Green)),
        Cell::Flag(false) => ("✗".to_string(), Style::default().fg(Color::Red)),
        Cell::Text(text) => (text.clone(), Style::default().fg(Color::White)),
    }
}

/// Width per column: configured width, else the widest header or cell on
/// the page, capped
fn column_widths(columns: &[Column], rows: &[Vec<Cell>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            if column.checkbox_selection {
                return SELECTION_WIDTH;
            }
            if let Some(width) = column.width {
                return usize::from(width);
            }
            // room for the sort indicator
            let header = column.header().width() + 2;
            let widest = rows
                .iter()
                .filter_map(|cells| cells.get(i))
                .map(|cell| cell_text(cell).0.width())
                .max()
                .unwrap_or(0);
            header.max(widest).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn row_spans(cells: &[Cell], widths: &[usize], selected: bool) -> Vec<Span<'static>> {
    cells
        .iter()
        .zip(widths)
        .flat_map(|(cell, &width)| {
            let (text, mut style) = cell_text(cell);
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            vec![Span::styled(fit(&text, width), style), Span::raw(SEPARATOR)]
        })
        .collect()
}

fn separator_line(widths: &[usize]) -> Line<'static> {
    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray)))
}

/// Pad or truncate `text` to exactly `width` terminal cells
pub fn fit(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width - used));
    out
}

/// Pager line: navigation controls, page position, row range and page size
pub fn render_pager(frame: &mut Frame, area: Rect, info: &PageInfo) {
    let control = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let spans = vec![
        control(" ◀◀ ", info.has_previous()),
        control(" ◀ ", info.has_previous()),
        Span::styled(
            format!(" Page {} of {} ", info.current_page, info.total_pages),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        control(" ▶ ", info.has_next()),
        control(" ▶▶ ", info.has_next()),
        Span::styled(
            format!(
                "  {} to {} of {}",
                info.range.start, info.range.end, info.range.total
            ),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {} per page", info.page_size),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
        // wide characters never split a cell
        assert_eq!(fit("日本語", 4), "日… ");
        assert_eq!(fit("日本", 4), "日本");
    }

    #[test]
    fn test_double_activation_window() {
        let mut table = GridTable::new();
        let start = Instant::now();

        assert_eq!(table.activation(start), Activation::Single);
        assert_eq!(
            table.activation(start + Duration::from_millis(300)),
            Activation::Double
        );
        // a double consumes the pair
        assert_eq!(
            table.activation(start + Duration::from_millis(350)),
            Activation::Single
        );
        assert_eq!(
            table.activation(start + Duration::from_millis(900)),
            Activation::Single
        );
    }

    #[test]
    fn test_activation_on_another_row_is_single() {
        let mut table = GridTable::new();
        let start = Instant::now();
        table.activation(start);
        table.row_cursor = 1;
        assert_eq!(
            table.activation(start + Duration::from_millis(100)),
            Activation::Single
        );
    }

    #[test]
    fn test_clamp_cursors() {
        let mut table = GridTable::new();
        table.row_cursor = 12;
        table.column_cursor = 4;
        table.clamp(3, 2);
        assert_eq!((table.row_cursor, table.column_cursor), (2, 1));

        table.clamp(0, 0);
        assert_eq!((table.row_cursor, table.column_cursor), (0, 0));
    }

    #[test]
    fn test_key_bindings() {
        let mut table = GridTable::new();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(table.handle_key_event(press(KeyCode::Char('s'))).unwrap(), Some(Action::ToggleSort));
        assert_eq!(table.handle_key_event(press(KeyCode::Char(' '))).unwrap(), Some(Action::ToggleRowSelection));
        assert_eq!(table.handle_key_event(press(KeyCode::Char('G'))).unwrap(), Some(Action::LastPage));
        assert_eq!(
            table
                .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .unwrap(),
            Some(Action::ForceQuit)
        );
        assert_eq!(table.handle_key_event(press(KeyCode::Tab)).unwrap(), None);
    }

    #[test]
    fn test_column_widths() {
        let columns = vec![
            Column::new("id").checkbox_selection(),
            Column::new("name"),
            Column::new("note").width(6),
        ];
        let rows = vec![vec![
            Cell::SelectionBox { checked: false },
            Cell::Text("a much longer name".to_string()),
            Cell::Text("ignored".to_string()),
        ]];

        assert_eq!(column_widths(&columns, &rows), vec![3, 18, 6]);
        assert_eq!(column_widths(&columns, &[]), vec![3, 6, 6]);
    }

    #[test]
    fn test_header_text_shows_indicator() {
        let column = Column::new("name").label("Name");
        assert_eq!(header_text(&column, ""), "Name");
        assert_eq!(header_text(&column, "▲"), "Name ▲");
    }
}
