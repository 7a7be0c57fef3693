//! Login, signup and password reset screens

use super::field_renderer::{draw_field, draw_help_text, field_height};
use super::{form_column, stack};
use crate::app::App;
use crate::state::forms::{AuthMode, Form};
use crate::ui::components::render_button;
use ratatui::{
    layout::{Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_auth(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.auth_form;
    let column = form_column(area, 60);

    let block = Block::default()
        .title(format!(" {} ", form.mode.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(column);
    frame.render_widget(block, column);

    let fields: Vec<_> = (0..form.field_count())
        .filter_map(|i| form.get_field(i))
        .collect();

    let mut heights = vec![2];
    heights.extend(fields.iter().map(|f| field_height(f)));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(stack(heights))
        .margin(1)
        .split(inner);

    // Role selector
    let role_line = if form.mode == AuthMode::Reset {
        Line::from(Span::styled(
            "We will send a reset link to your email",
            Style::default().fg(Color::Gray),
        ))
    } else {
        Line::from(vec![
            Span::raw("I am a "),
            Span::styled(
                format!("< {} >", form.role.label()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (F4 to switch)", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(role_line), chunks[0]);

    for (idx, field) in fields.iter().enumerate() {
        let check = form.visible_check(&field.name);
        draw_field(
            frame,
            chunks[idx + 1],
            field,
            form.active_field() == idx,
            check.as_ref(),
        );
    }

    let button_idx = fields.len() + 1;
    let label = if form.submitting {
        "Please wait..."
    } else {
        match form.mode {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Create Account",
            AuthMode::Reset => "Send Reset Link",
        }
    };
    let button_area = form_column(chunks[button_idx], 24);
    render_button(frame, button_area, label, true, !form.submitting, Color::Green);

    let hints: &[(&str, &str)] = match form.mode {
        AuthMode::Login => &[
            ("Enter", "login"),
            ("F2", "sign up"),
            ("F3", "forgot password"),
            ("F5", "contact"),
            ("Esc", "quit"),
        ],
        AuthMode::Signup => &[("Enter", "sign up"), ("F1", "login"), ("Esc", "back")],
        AuthMode::Reset => &[("Enter", "send"), ("Esc", "back")],
    };
    draw_help_text(frame, chunks[button_idx + 1], hints);
}
