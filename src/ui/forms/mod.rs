//! Form rendering module
//!
//! - `field_renderer`: field boxes with inline validation feedback
//! - `auth_form`: login, signup and password reset
//! - `contact_form`: contact us
//! - `wizard_form`: the three-step onboarding wizard

mod auth_form;
mod contact_form;
mod field_renderer;
mod wizard_form;

pub use auth_form::draw_auth;
pub use contact_form::draw_contact;
pub use wizard_form::draw_wizard;

use ratatui::layout::{Constraint, Rect};

/// Horizontally centered column for form content
fn form_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Constraints for a stack of fields followed by a button and help line
fn stack(heights: impl IntoIterator<Item = u16>) -> Vec<Constraint> {
    heights
        .into_iter()
        .map(Constraint::Length)
        .chain([
            Constraint::Length(crate::ui::components::BUTTON_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .collect()
}
