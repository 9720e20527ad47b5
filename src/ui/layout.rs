use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Below this width the sidebar is hidden unless toggled open
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 100;

const SIDEBAR_WIDTH: u16 = 28;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub main: Rect,
    pub status_line: Rect,
    pub hint_line: Rect,
}

pub fn areas(size: Rect, sidebar_open: bool) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let show_sidebar = sidebar_open || size.width >= WIDE_LAYOUT_MIN_WIDTH;
    let (sidebar, main) = if show_sidebar {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(vertical[1]);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, vertical[1])
    };

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[2]);

    UiAreas {
        size,
        header: vertical[0],
        sidebar,
        main,
        status_line: footer_chunks[0],
        hint_line: footer_chunks[1],
    }
}
