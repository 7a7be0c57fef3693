//! Field rendering utilities for forms

use crate::state::forms::{FieldCheck, FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field needs: bordered box plus one feedback line
pub fn field_height(field: &FormField) -> u16 {
    match field.value {
        FieldValue::MultiChoice { .. } => 5,
        _ => 4,
    }
}

fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Options of a multi-choice field as `[x] label` spans
fn multi_choice_spans<'a>(
    options: &'a [String],
    selected: &std::collections::BTreeSet<usize>,
    cursor: usize,
    is_active: bool,
) -> Vec<Span<'a>> {
    options
        .iter()
        .enumerate()
        .flat_map(|(idx, option)| {
            let mark = if selected.contains(&idx) { "[x] " } else { "[ ] " };
            let mut style = if selected.contains(&idx) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            if is_active && idx == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [Span::styled(format!("{mark}{option}"), style), Span::raw("  ")]
        })
        .collect()
}

/// Draw a form field with its validation feedback underneath
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    feedback: Option<&FieldCheck>,
) {
    let box_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let note_area = Rect {
        y: area.y + box_area.height,
        height: area.height.min(1),
        ..area
    };

    let value_style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let content = match &field.value {
        FieldValue::MultiChoice {
            options,
            selected,
            cursor,
        } => Line::from(multi_choice_spans(options, selected, *cursor, is_active)),
        _ => {
            let display = field.display_value();
            let display = if display.is_empty() && !is_active {
                "(empty)".to_string()
            } else {
                display
            };
            let cursor = if is_active && field.is_text_input() {
                "▌"
            } else {
                ""
            };
            Line::from(vec![
                Span::styled(display, value_style),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ])
        }
    };

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));
    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(block),
        box_area,
    );

    if let Some(check) = feedback.filter(|c| !c.message.is_empty()) {
        let (icon, color) = if check.valid {
            ("✓ ", Color::Green)
        } else {
            ("✗ ", Color::Red)
        };
        let note = Paragraph::new(Line::from(Span::styled(
            format!(" {icon}{}", check.message),
            Style::default().fg(color),
        )));
        frame.render_widget(note, note_area);
    }
}

/// Draw keyboard help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(key.to_string(), Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {action}  "), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
