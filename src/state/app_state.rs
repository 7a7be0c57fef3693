//! Application state definitions

use super::forms::{AuthForm, ContactForm, WizardState};
use crate::contact::ContactMessage;
use crate::store::Document;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Login, signup and password reset
    #[default]
    Auth,
    Contact,
    /// Onboarding wizard for the session's role
    Wizard,
    Dashboard,
    /// Contact message moderation
    Admin,
}

impl View {
    pub fn is_form_view(&self) -> bool {
        matches!(self, View::Auth | View::Contact | View::Wizard)
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Auth => "Account",
            View::Contact => "Contact Us",
            View::Wizard => "Complete Your Profile",
            View::Dashboard => "Dashboard",
            View::Admin => "Admin Panel",
        }
    }
}

/// Marketplace role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    #[default]
    Manufacturer,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "farmer" => Some(Role::Farmer),
            "manufacturer" => Some(Role::Manufacturer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Manufacturer => "manufacturer",
        }
    }

    /// Collection holding this role's profile documents
    pub fn collection(&self) -> &'static str {
        match self {
            Role::Farmer => "farmers",
            Role::Manufacturer => "manufacturers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Farmer => "Farmer",
            Role::Manufacturer => "Manufacturer",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Role::Farmer => Role::Manufacturer,
            Role::Manufacturer => Role::Farmer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user as seen by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: String,
    /// `None` for the administrator
    pub role: Option<Role>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_none()
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Session
    pub session: Option<Session>,

    // Forms
    pub auth_form: AuthForm,
    pub contact_form: ContactForm,
    pub wizard: Option<WizardState>,

    // Data
    /// Persisted role profile shown on the dashboard
    pub profile: Option<Document>,
    pub messages: Vec<ContactMessage>,

    // Selection
    pub selected_index: usize,
    pub scroll_offset: usize,

    // UI state
    /// Message id awaiting delete confirmation
    pub confirm_delete: Option<String>,
    /// Shown above the wizard while reference data is unavailable
    pub region_notice: Option<String>,
    errors: VecDeque<String>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn selected_message(&self) -> Option<&ContactMessage> {
        self.messages.get(self.selected_index)
    }

    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::debug!("error queued: {message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Errors queued behind the one on screen
    pub fn queued_errors(&self) -> usize {
        self.errors.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Forget everything tied to the signed-in user
    pub fn clear_session(&mut self) {
        self.session = None;
        self.wizard = None;
        self.profile = None;
        self.messages.clear();
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.confirm_delete = None;
        self.view_history.clear();
    }
}
