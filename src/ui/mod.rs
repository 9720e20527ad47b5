use chrono::Utc;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    Wrap,
};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, StatusLevel, UserMenuItem};
use crate::core::ViewId;
use crate::domain::{
    BookingStatus, DashboardSummary, FleetKind, FleetRecord, MessageStatus, NotificationCategory,
};

/// Colors for the light and dark themes
#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    ok: Color,
    warn: Color,
    err: Color,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            bg: Color::Black,
            fg: Color::White,
            muted: Color::DarkGray,
            accent: Color::LightCyan,
            ok: Color::LightGreen,
            warn: Color::Yellow,
            err: Color::LightRed,
        }
    } else {
        Palette {
            bg: Color::Reset,
            fg: Color::Reset,
            muted: Color::Gray,
            accent: Color::Blue,
            ok: Color::Green,
            warn: Color::Rgb(180, 120, 0),
            err: Color::Red,
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let pal = palette(app.dark_mode);
    f.render_widget(
        Block::default().style(Style::default().bg(pal.bg).fg(pal.fg)),
        size,
    );

    let areas = layout::areas(size, app.sidebar_open);

    draw_header(f, areas.header, app, pal);
    if let Some(sidebar) = areas.sidebar {
        draw_sidebar(f, sidebar, app, pal);
    }
    match app.active_view() {
        ViewId::Dashboard => draw_dashboard(f, areas.main, app, pal),
        ViewId::Reports => draw_reports(f, areas.main, app, pal),
        view => draw_placeholder(f, areas.main, view, pal),
    }
    draw_status_line(f, areas.status_line, app, pal);
    draw_hint_line(f, areas.hint_line, app, pal);

    if app.notifications_open {
        draw_notification_panel(f, areas.size, app, pal);
    }
    if app.user_menu_open {
        draw_user_menu(f, areas.size, app, pal);
    }
    if app.help_open {
        draw_help_popup(f, areas.size, pal);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut title = vec![
        Span::styled(
            "Owner",
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.title(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if app.model().loading {
        title.push(Span::styled("  loading...", Style::default().fg(pal.muted)));
    } else if app.model().refreshing {
        title.push(Span::styled("  refreshing...", Style::default().fg(pal.muted)));
    }

    let left = Paragraph::new(Line::from(title))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let unread = app.notifications().unread_total();
    let bell_style = if unread > 0 {
        Style::default().fg(pal.warn).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(pal.muted)
    };
    let session = app.session();
    let right_line = Line::from(vec![
        Span::styled("Alerts ", Style::default().fg(pal.muted)),
        Span::styled(unread.to_string(), bell_style),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", session.initial()),
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}", session.header_name())),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Right);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    f.render_widget(Clear, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(11), Constraint::Length(5)])
        .split(area);

    let items: Vec<ListItem> = ViewId::ALL
        .iter()
        .map(|view| {
            let is_active = *view == app.active_view();
            let mut spans = vec![
                Span::styled(format!("{} ", view.shortcut()), Style::default().fg(pal.muted)),
                Span::raw(view.title()),
            ];
            if let Some(count) = app.nav_badge(*view).filter(|count| *count > 0) {
                spans.push(Span::styled(
                    format!(" ({count})"),
                    Style::default().fg(pal.warn).add_modifier(Modifier::BOLD),
                ));
            }
            let style = if is_active {
                Style::default().fg(pal.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Navigation"))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(
        ViewId::ALL
            .iter()
            .position(|view| *view == app.active_view()),
    );
    f.render_stateful_widget(list, chunks[0], &mut state);

    let session = app.session();
    let footer = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            session.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(session.role_label(), Style::default().fg(pal.muted))),
        Line::from(Span::styled(session.email(), Style::default().fg(pal.muted))),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[1]);
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let model = app.model();
    let banner_height = if model.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Min(6),
        ])
        .split(area);

    if let Some(error) = model.error.as_deref() {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled("Error ", Style::default().fg(pal.err).add_modifier(Modifier::BOLD)),
            Span::raw(error.to_string()),
            Span::styled("  (r to retry)", Style::default().fg(pal.muted)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.err)),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(banner, chunks[0]);
    }

    draw_summary_cards(f, chunks[1], &model.data.summary, pal);

    let activity = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    draw_recent_bookings(f, activity[0], app, pal);
    draw_recent_messages(f, activity[1], app, pal);

    let fleet = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    draw_fleet_table(f, fleet[0], app, FleetKind::Car, pal);
    draw_fleet_table(f, fleet[1], app, FleetKind::Tour, pal);
}

fn draw_summary_cards(f: &mut Frame, area: Rect, summary: &DashboardSummary, pal: Palette) {
    let cards = [
        ("Cars", summary.total_cars),
        ("Tours", summary.total_tours),
        ("Bookings", summary.total_bookings),
        ("Pending", summary.pending_bookings),
        ("Messages", summary.total_messages),
        ("New msgs", summary.new_messages),
    ];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 6])
        .split(area);

    for ((label, value), chunk) in cards.iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(pal.accent).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(*label))
        .alignment(Alignment::Center);
        f.render_widget(card, *chunk);
    }
}

fn draw_recent_bookings(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let bookings = &app.model().data.recent_bookings;
    let block = Block::default().borders(Borders::ALL).title("Recent Bookings");
    if bookings.is_empty() {
        f.render_widget(empty_state("No recent bookings", block, pal), area);
        return;
    }

    let rows: Vec<Row> = bookings
        .iter()
        .map(|booking| {
            let status_color = match booking.status {
                BookingStatus::Pending => pal.warn,
                BookingStatus::Confirmed | BookingStatus::Completed => pal.ok,
                BookingStatus::Cancelled => pal.err,
            };
            Row::new(vec![
                Cell::from(truncate_str(&booking.customer_name(), 18)),
                Cell::from(truncate_str(&booking.item_name, 22)),
                Cell::from(format!("{:.2}", booking.total_price)),
                Cell::from(booking.status.as_str()).style(Style::default().fg(status_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ],
    )
    .header(header_row(&["Customer", "Item", "Total", "Status"], pal))
    .block(block);
    f.render_widget(table, area);
}

fn draw_recent_messages(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let messages = &app.model().data.recent_messages;
    let block = Block::default().borders(Borders::ALL).title("Recent Messages");
    if messages.is_empty() {
        f.render_widget(empty_state("No recent messages", block, pal), area);
        return;
    }

    let rows: Vec<Row> = messages
        .iter()
        .map(|message| {
            let style = match message.status {
                MessageStatus::New => Style::default().add_modifier(Modifier::BOLD),
                MessageStatus::Read => Style::default().fg(pal.muted),
            };
            Row::new(vec![
                Cell::from(truncate_str(&message.sender_name, 16)),
                Cell::from(truncate_str(&message.subject, 28)),
                Cell::from(message.status.as_str()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(55),
            Constraint::Percentage(15),
        ],
    )
    .header(header_row(&["From", "Subject", "Status"], pal))
    .block(block);
    f.render_widget(table, area);
}

fn draw_fleet_table(f: &mut Frame, area: Rect, app: &App, kind: FleetKind, pal: Palette) {
    let focused = app.fleet_focus() == kind;
    let title = match kind {
        FleetKind::Car => "Cars",
        FleetKind::Tour => "Tours",
    };
    let border_style = if focused {
        Style::default().fg(pal.accent)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    let data = &app.model().data;
    let len = data.fleet_len(kind);
    if len == 0 {
        f.render_widget(empty_state("Nothing to show", block, pal), area);
        return;
    }

    let rows: Vec<Row> = (0..len)
        .filter_map(|index| data.fleet_record(kind, index))
        .map(|record| fleet_row(record, pal))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header_row(&["Name", "Price", "State"], pal))
    .block(block)
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.selected_index(kind)));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn fleet_row(record: &dyn FleetRecord, pal: Palette) -> Row<'static> {
    let (state, color) = if record.available() {
        ("active", pal.ok)
    } else {
        ("archived", pal.muted)
    };
    Row::new(vec![
        Cell::from(truncate_str(&record.display_name(), 30)),
        Cell::from(format!("{:.2}", record.price())),
        Cell::from(state).style(Style::default().fg(color)),
    ])
}

fn draw_reports(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let summary = &app.model().data.summary;
    let lines = vec![
        Line::from(Span::styled(
            "Dashboard report",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Active cars        {}", summary.total_cars)),
        Line::from(format!("Active tours       {}", summary.total_tours)),
        Line::from(format!(
            "Bookings           {} ({} pending)",
            summary.total_bookings, summary.pending_bookings
        )),
        Line::from(format!(
            "Messages           {} ({} new)",
            summary.total_messages, summary.new_messages
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press e to export the last loaded dashboard as JSON and CSV.",
            Style::default().fg(pal.muted),
        )),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Reports"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, view: ViewId, pal: Palette) {
    let lines = vec![
        Line::from(Span::styled(
            view.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} is managed in the web console.", view.title()),
            Style::default().fg(pal.muted),
        )),
        Line::from(Span::styled(
            "Press 1 to return to the dashboard.",
            Style::default().fg(pal.muted),
        )),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(view.title()))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let line = match app.status_text() {
        Some((text, level)) => {
            let color = match level {
                StatusLevel::Info => pal.ok,
                StatusLevel::Warn => pal.warn,
                StatusLevel::Error => pal.err,
            };
            Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
        }
        None => Line::from(vec![
            Span::styled("Path ", Style::default().fg(pal.muted)),
            Span::raw(app.path().to_string()),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_hint_line(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let mut hints = vec!["1-9 pane", "r refresh", "s menu", "u user", "n alerts", "d theme"];
    match app.active_view() {
        ViewId::Dashboard => hints.extend(["Tab fleet", "j/k move", "a archive"]),
        ViewId::Reports => hints.push("e export"),
        _ => {}
    }
    hints.extend(["? help", "q quit"]);
    let line = Line::from(Span::styled(hints.join("  "), Style::default().fg(pal.muted)));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_notification_panel(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let popup_area = centered_rect(64, 60, area);
    f.render_widget(Clear, popup_area);

    let now = Utc::now();
    let events = app.notifications().list();
    let items: Vec<ListItem> = if events.is_empty() {
        vec![ListItem::new(Span::styled(
            "No notifications",
            Style::default().fg(pal.muted),
        ))]
    } else {
        events
            .iter()
            .map(|event| {
                let marker = if event.read { "  " } else { "* " };
                let tag_color = match event.category {
                    NotificationCategory::Booking => pal.accent,
                    NotificationCategory::Message => pal.ok,
                    NotificationCategory::System => pal.err,
                };
                let style = if event.read {
                    Style::default().fg(pal.muted)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        format!("{:<8}", event.category.label()),
                        Style::default().fg(tag_color),
                    ),
                    Span::styled(truncate_str(&event.message, 60), style),
                    Span::styled(
                        format!("  {}", event.time_label(now)),
                        Style::default().fg(pal.muted),
                    ),
                ]))
            })
            .collect()
    };

    let title = format!(
        "Notifications ({} unread) - m mark all read",
        app.notifications().unread_total()
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, popup_area);
}

fn draw_user_menu(f: &mut Frame, area: Rect, app: &App, pal: Palette) {
    let popup_area = centered_rect(40, 40, area);
    f.render_widget(Clear, popup_area);

    let session = app.session();
    let mut lines = vec![
        Line::from(Span::styled(
            session.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(session.email(), Style::default().fg(pal.muted))),
        Line::from(""),
    ];
    for item in UserMenuItem::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", item.key()), Style::default().fg(pal.accent)),
            Span::raw(item.label()),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Account"));
    f.render_widget(paragraph, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect, pal: Palette) {
    let popup_area = centered_rect(60, 64, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled("Navigation", Style::default().fg(pal.accent))),
        Line::from("  1-9        Jump to pane"),
        Line::from("  s          Toggle sidebar"),
        Line::from("  Esc        Close overlay"),
        Line::from(""),
        Line::from(Span::styled("Dashboard", Style::default().fg(pal.accent))),
        Line::from("  r          Refresh"),
        Line::from("  Tab        Switch cars / tours"),
        Line::from("  j / k      Move selection"),
        Line::from("  a          Archive / restore selected"),
        Line::from(""),
        Line::from(Span::styled("Other", Style::default().fg(pal.accent))),
        Line::from("  n          Notifications (m marks all read)"),
        Line::from("  u          Account menu (p, c, o)"),
        Line::from("  e          Export (Reports)"),
        Line::from("  d          Toggle dark mode"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn header_row(titles: &[&'static str], pal: Palette) -> Row<'static> {
    Row::new(titles.iter().map(|title| Cell::from(*title)))
        .style(Style::default().fg(pal.muted).add_modifier(Modifier::BOLD))
}

fn empty_state<'a>(text: &'a str, block: Block<'a>, pal: Palette) -> Paragraph<'a> {
    Paragraph::new(Span::styled(text, Style::default().fg(pal.muted)))
        .block(block)
        .alignment(Alignment::Center)
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
