//! Contact message moderation

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_list(frame, chunks[0], app);
    draw_detail(frame, chunks[1], app);
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let messages = &app.state.messages;
    let unread = messages.iter().filter(|m| m.is_unread()).count();
    let block = Block::default()
        .title(format!(" Messages ({unread} unread) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if messages.is_empty() {
        let empty = Paragraph::new("No contact messages yet.\nPress 'r' to refresh.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = messages
        .iter()
        .map(|message| {
            let (marker, name_style) = if message.is_unread() {
                (
                    Span::styled("● ", Style::default().fg(Color::Yellow)),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                (Span::raw("  "), Style::default().fg(Color::Gray))
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(message.received_at(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(message.name.as_str(), name_style),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.state.selected_index));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▸");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(message) = app.state.selected_message() else {
        frame.render_widget(block, area);
        return;
    };

    let status = if message.is_unread() {
        Span::styled("unread", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("read", Style::default().fg(Color::Green))
    };
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![Span::styled("From:     ", label), Span::raw(message.name.as_str())]),
        Line::from(vec![Span::styled("Email:    ", label), Span::raw(message.email.as_str())]),
        Line::from(vec![Span::styled("Received: ", label), Span::raw(message.received_at())]),
        Line::from(vec![Span::styled("Status:   ", label), status]),
        Line::from(""),
    ];
    lines.extend(message.message.lines().map(|l| Line::from(l.to_string())));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
