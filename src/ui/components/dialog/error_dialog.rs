//! Error dialog component

use super::base::{key_hint, render_dialog, DialogConfig};
use ratatui::{style::Color, text::Span, Frame};

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, error_message: &str, remaining: usize) {
    let mut hint = vec![Span::raw("Press ")];
    hint.extend(key_hint("Enter", " or "));
    hint.extend(key_hint("Esc", " to dismiss"));
    if remaining > 0 {
        hint.push(Span::raw(format!(" ({remaining} more)")));
    }

    render_dialog(
        frame,
        DialogConfig {
            title: "Error",
            accent: Color::Red,
            message: error_message,
            hint,
            max_width: 60,
        },
    );
}
