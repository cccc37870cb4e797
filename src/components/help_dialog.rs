//! Help dialog component
//!
//! Lists every key binding of the grid view.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::CloseModal {
            self.scroll_offset = 0;
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin / 2,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin),
        );
        frame.render_widget(Clear, dialog_area);

        let content = help_lines();
        let total = content.len();
        let visible_height = usize::from(dialog_area.height.saturating_sub(2));

        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keys ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Rows & Columns",
        &[
            ("j / ↓", "Next row"),
            ("k / ↑", "Previous row"),
            ("l / →", "Next column"),
            ("h / ←", "Previous column"),
            ("s", "Sort by column: ascending, descending, off"),
            ("Enter", "Activate row (twice quickly to open)"),
        ],
    ),
    (
        "Pages",
        &[
            ("n / PgDn", "Next page"),
            ("p / PgUp", "Previous page"),
            ("g / Home", "First page"),
            ("G / End", "Last page"),
            ("+ / -", "Larger or smaller page size"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Edit the search query"),
            ("Enter / Esc", "Leave the search box"),
        ],
    ),
    (
        "Selection",
        &[
            ("Space", "Toggle row"),
            ("a", "Select every row on the page"),
            ("A", "Deselect every row on the page"),
            ("Esc", "Clear selection"),
        ],
    ),
    (
        "Data",
        &[
            ("e", "Export filtered rows to CSV"),
            ("r", "Reload the dataset"),
            ("?", "Show this help"),
            ("q", "Quit"),
        ],
    ),
];

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (title, bindings) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count() + 2)),
            Style::default().fg(Color::DarkGray),
        )));

        for (key, description) in bindings.iter() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:14}", key),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*description, Style::default().fg(Color::White)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_every_section_is_listed() {
        let text: Vec<String> = help_lines().iter().map(|l| l.to_string()).collect();
        for (title, bindings) in SECTIONS {
            assert!(text.iter().any(|l| l.contains(title)));
            assert!(text.len() > bindings.len());
        }
    }

    #[test]
    fn test_scroll_and_close() {
        let mut dialog = HelpDialog::default();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        dialog.handle_key_event(press(KeyCode::Char('j'))).unwrap();
        dialog.handle_key_event(press(KeyCode::Char('j'))).unwrap();
        dialog.handle_key_event(press(KeyCode::Char('k'))).unwrap();
        assert_eq!(dialog.scroll_offset, 1);

        let action = dialog.handle_key_event(press(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::CloseModal));
    }
}
