//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{LOGOUT_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header, content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the header with the product name, view title and signed-in user
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " AgriLink ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.state.current_view.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(session) = &app.state.session {
        let who = match session.role {
            Some(role) => format!("{} ({})", session.email, role.label()),
            None => format!("{} (Admin)", session.email),
        };
        spans.push(Span::styled(
            format!("  {who}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    let hints = get_view_hints(&app.state.current_view, app.state.session.is_some());
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        width: (quit_hint.len() as u16).min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View, signed_in: bool) -> String {
    let base = match view {
        View::Auth => "Tab:next  Enter:submit  F1:login  F2:sign up  F3:reset  F4:role".to_string(),
        View::Contact => format!("Tab:next  {SUBMIT_SHORTCUT}:send  Esc:back"),
        View::Wizard => format!("Tab:next  Enter:continue  {SUBMIT_SHORTCUT}:submit  Esc:prev"),
        View::Dashboard => "e:edit profile  r:refresh  c:contact  l:logout".to_string(),
        View::Admin => "j/k:nav  m:mark read  d:delete  r:refresh  l:logout".to_string(),
    };
    if signed_in && view.is_form_view() {
        format!("{base}  {LOGOUT_SHORTCUT}:logout")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_reserves_header_and_status() {
        let (header, main, status) = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(header.height, 1);
        assert_eq!(main, Rect::new(0, 1, 80, 22));
        assert_eq!(status.y, 23);
    }

    #[test]
    fn test_wizard_hints_mention_logout_when_signed_in() {
        assert!(get_view_hints(&View::Wizard, true).contains(LOGOUT_SHORTCUT));
        assert!(!get_view_hints(&View::Auth, false).contains(LOGOUT_SHORTCUT));
    }
}
