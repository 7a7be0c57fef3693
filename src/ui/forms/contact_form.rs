//! Contact us screen

use super::field_renderer::{draw_field, draw_help_text, field_height};
use super::{form_column, stack};
use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::forms::{FieldCheck, Form};
use crate::ui::components::render_button;
use ratatui::{
    layout::{Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

pub fn draw_contact(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.contact_form;
    let column = form_column(area, 70);

    let block = Block::default()
        .title(" Contact Us ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(column);
    frame.render_widget(block, column);

    let fields: Vec<_> = (0..form.field_count())
        .filter_map(|i| form.get_field(i))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(stack(fields.iter().map(|f| field_height(f))))
        .margin(1)
        .split(inner);

    for (idx, field) in fields.iter().enumerate() {
        let error = form.visible_error(idx).map(FieldCheck::fail);
        draw_field(
            frame,
            chunks[idx],
            field,
            form.active_field() == idx,
            error.as_ref(),
        );
    }

    let label = if form.submitting {
        "Sending..."
    } else {
        "Send Message"
    };
    render_button(
        frame,
        form_column(chunks[fields.len()], 24),
        label,
        true,
        !form.submitting,
        Color::Green,
    );
    draw_help_text(
        frame,
        chunks[fields.len() + 1],
        &[("Tab", "next"), ("Enter", "send"), (SUBMIT_SHORTCUT, "send"), ("Esc", "back")],
    );
}
