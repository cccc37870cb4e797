//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen areas, top to bottom
pub struct MainLayout {
    pub search: Rect,
    pub table: Rect,
    pub pager: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Centered popup area, shrunk to fit `area`
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

pub fn calculate_main_layout(area: Rect, has_status: bool) -> MainLayout {
    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (status, help) = if has_status {
        (Some(chunks[3]), chunks[4])
    } else {
        (None, chunks[3])
    };

    MainLayout {
        search: chunks[0],
        table: chunks[1],
        pager: chunks[2],
        status,
        help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_fits_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_popup(area, 40, 10), Rect::new(30, 15, 40, 10));

        let small = Rect::new(0, 0, 20, 5);
        let popup = centered_popup(small, 40, 10);
        assert_eq!((popup.width, popup.height), (20, 5));
    }

    #[test]
    fn test_status_row_is_optional() {
        let area = Rect::new(0, 0, 80, 24);

        let without = calculate_main_layout(area, false);
        assert!(without.status.is_none());
        assert_eq!(without.table.height, 21);
        assert_eq!(without.help.y, 23);

        let with = calculate_main_layout(area, true);
        assert_eq!(with.status.map(|r| r.y), Some(22));
        assert_eq!(with.table.height, 20);
    }
}
