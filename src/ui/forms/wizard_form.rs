//! Onboarding wizard screen

use super::field_renderer::{draw_field, draw_help_text, field_height};
use super::{form_column, stack};
use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::forms::{FieldCheck, Wizard, STEPS};
use crate::ui::components::render_button;
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Step tabs, with the current step highlighted and finished ones checked
fn progress_line(wizard: &dyn Wizard) -> Line<'static> {
    let current = wizard.current_step();
    let mut spans = Vec::new();
    for step in 1..=STEPS {
        let (marker, style) = if step < current {
            ("✓", Style::default().fg(Color::Green))
        } else if step == current {
            (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(
            format!("{marker} {}", wizard.step_title(step)),
            style,
        ));
        if step < STEPS {
            spans.push(Span::styled("  ─  ", Style::default().fg(Color::DarkGray)));
        }
    }
    Line::from(spans)
}

pub fn draw_wizard(frame: &mut Frame, area: Rect, app: &App) {
    let Some(state) = app.state.wizard.as_ref() else {
        return;
    };
    let wizard = state.wizard();
    let form = wizard.form();
    let step = wizard.current_step();
    let ctx = wizard.context(&app.regions, Local::now().date_naive());

    let column = form_column(area, 72);
    let block = Block::default()
        .title(format!(
            " {} Profile - Step {step} of {STEPS} ",
            wizard.role().label()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(column);
    frame.render_widget(block, column);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Progress
            Constraint::Length(if app.state.region_notice.is_some() { 2 } else { 0 }),
            Constraint::Min(0), // Fields
        ])
        .margin(1)
        .split(inner);

    frame.render_widget(Paragraph::new(progress_line(wizard)), outer[0]);

    if let Some(notice) = &app.state.region_notice {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{notice}. Enter state and district manually."),
                Style::default().fg(Color::Yellow),
            )),
            outer[1],
        );
    }

    let fields = form.fields(step);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(stack(fields.iter().map(field_height)))
        .split(outer[2]);

    for (idx, field) in fields.iter().enumerate() {
        let error = wizard
            .visible_error(&field.name, &ctx)
            .map(FieldCheck::fail);
        draw_field(
            frame,
            chunks[idx],
            field,
            form.active_field == idx,
            error.as_ref(),
        );
    }

    let (label, enabled) = if step < STEPS {
        ("Next", true)
    } else if form.submitting {
        ("Saving...", false)
    } else {
        ("Submit", wizard.can_submit(&ctx))
    };
    render_button(
        frame,
        form_column(chunks[fields.len()], 20),
        label,
        true,
        enabled,
        Color::Green,
    );

    let mut hints = vec![("Tab", "next field"), ("←/→", "choose"), ("Space", "toggle")];
    if step < STEPS {
        hints.push(("Enter", "next step"));
    } else {
        hints.push(("Enter", "submit"));
        hints.push((SUBMIT_SHORTCUT, "submit"));
    }
    if step > 1 {
        hints.push(("Esc", "previous step"));
    }
    draw_help_text(frame, chunks[fields.len() + 1], &hints);
}
