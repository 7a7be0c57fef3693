//! Profile summary shown once onboarding is complete

use crate::app::App;
use crate::state::Role;
use crate::store::Document;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

const FARMER_ROWS: &[(&str, &str)] = &[
    ("Name", "name"),
    ("Mobile", "mobile"),
    ("Language", "language"),
    ("State", "state"),
    ("District", "district"),
    ("Village", "village"),
    ("Pincode", "pincode"),
    ("Soil Type", "soilType"),
    ("Crops", "crops"),
    ("Land Size (acres)", "landSize"),
];

const MANUFACTURER_ROWS: &[(&str, &str)] = &[
    ("Name", "name"),
    ("Mobile", "mobileNumber"),
    ("Business", "businessName"),
    ("Business Type", "businessType"),
    ("GST Number", "gstNumber"),
    ("State", "state"),
    ("District", "district"),
    ("City", "city"),
    ("Pincode", "pincode"),
    ("Stubble Types", "stubbleTypes"),
    ("Monthly Requirement (tons)", "monthlyRequirement"),
];

fn format_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "-".to_string(),
    }
}

/// Label and rendered value for each summary row of the role
fn profile_rows(role: Role, profile: &Document) -> Vec<(&'static str, String)> {
    let rows = match role {
        Role::Farmer => FARMER_ROWS,
        Role::Manufacturer => MANUFACTURER_ROWS,
    };
    rows.iter()
        .map(|(label, key)| (*label, format_value(profile.get(*key))))
        .collect()
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.state.session.as_ref() else {
        return;
    };
    let role = session.role.unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} Dashboard", role.label()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            session.email.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(header, chunks[0]);

    let block = Block::default()
        .title(" Your Profile ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(profile) = app.state.profile.as_ref() else {
        let empty = Paragraph::new("No profile saved yet.\nPress 'e' to complete your profile.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, chunks[1]);
        return;
    };

    let label_width = profile_rows(role, profile)
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = profile_rows(role, profile)
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_width$}  "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        chunks[1],
    );
}
