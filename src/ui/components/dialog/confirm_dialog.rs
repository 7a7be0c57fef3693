//! Confirmation dialog for deleting a contact message

use super::base::{key_hint, render_dialog, DialogConfig};
use crate::contact::ContactMessage;
use ratatui::{style::Color, Frame};

pub fn render_confirm_dialog(frame: &mut Frame, message: &ContactMessage) {
    let sender = if message.name.is_empty() {
        "an unknown sender".to_string()
    } else {
        message.name.clone()
    };
    let text = format!("Delete the message from {sender}? This cannot be undone.");

    let mut hint = Vec::new();
    hint.extend(key_hint("y", " delete  "));
    hint.extend(key_hint("n", " cancel"));

    render_dialog(
        frame,
        DialogConfig {
            title: "Confirm Delete",
            accent: Color::Red,
            message: &text,
            hint,
            max_width: 50,
        },
    );
}
