//! Form state management and form structs

use super::farmer::FarmerWizard;
use super::field::FormField;
use super::manufacturer::ManufacturerWizard;
use super::validators::*;
use super::wizard::Wizard;
use crate::regions::RegionData;
use crate::state::Role;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.touch_active();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.touch_active();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn touch_active(&mut self) {
        self.get_active_field_mut().touched = true;
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// The wizard currently mounted, if any
#[derive(Debug, Clone)]
pub enum WizardState {
    Farmer(FarmerWizard),
    Manufacturer(ManufacturerWizard),
}

impl WizardState {
    pub fn for_role(role: Role, regions: &RegionData) -> Self {
        match role {
            Role::Farmer => WizardState::Farmer(FarmerWizard::new(regions)),
            Role::Manufacturer => WizardState::Manufacturer(ManufacturerWizard::new(regions)),
        }
    }

    pub fn wizard(&self) -> &dyn Wizard {
        match self {
            WizardState::Farmer(w) => w,
            WizardState::Manufacturer(w) => w,
        }
    }

    pub fn wizard_mut(&mut self) -> &mut dyn Wizard {
        match self {
            WizardState::Farmer(w) => w,
            WizardState::Manufacturer(w) => w,
        }
    }
}

/// Which of the auth screens is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
    Reset,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
            Self::Reset => "Reset Password",
        }
    }
}

// Auth Form
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub role: Role,
    pub name: FormField,
    pub email: FormField,
    pub password: FormField,
    pub confirm: FormField,
    pub active_field_index: usize,
    /// Reveal every message after a submit attempt
    pub attempted: bool,
    pub submitting: bool,
}

impl AuthForm {
    pub fn new(role: Role) -> Self {
        Self {
            mode: AuthMode::Login,
            role,
            name: FormField::text("name", "Full Name"),
            email: FormField::text("email", "Email"),
            password: FormField::text("password", "Password").masked(),
            confirm: FormField::text("confirm", "Confirm Password").masked(),
            active_field_index: 0,
            attempted: false,
            submitting: false,
        }
    }

    /// Switch screens, keeping the email but dropping secrets
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.password.clear();
        self.confirm.clear();
        self.name.touched = false;
        self.email.touched = false;
        self.active_field_index = 0;
        self.attempted = false;
    }

    pub fn toggle_role(&mut self) {
        self.role = self.role.other();
    }

    /// Fields shown on the current screen
    fn field_names(&self) -> &'static [&'static str] {
        match self.mode {
            AuthMode::Login => &["email", "password"],
            AuthMode::Signup => &["name", "email", "password", "confirm"],
            AuthMode::Reset => &["email"],
        }
    }

    fn by_name(&self, name: &str) -> &FormField {
        match name {
            "name" => &self.name,
            "password" => &self.password,
            "confirm" => &self.confirm,
            _ => &self.email,
        }
    }

    /// Validate one field for the current screen
    pub fn check(&self, name: &str) -> FieldCheck {
        let value = self.by_name(name).as_text();
        match (self.mode, name) {
            (_, "email") => validate_email(value),
            (AuthMode::Signup, "name") => validate_signup_name(value),
            (AuthMode::Signup, "password") => validate_signup_password(value),
            (AuthMode::Signup, "confirm") => {
                validate_confirm_password(self.password.as_text(), value)
            }
            (_, "password") => validate_login_password(value),
            _ => FieldCheck::ok(),
        }
    }

    /// Every visible field's check, in screen order
    pub fn checks(&self) -> Vec<(String, FieldCheck)> {
        self.field_names()
            .iter()
            .map(|name| (name.to_string(), self.check(name)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.checks().iter().all(|(_, check)| check.valid)
    }

    /// First failing message, used as the flow's error
    pub fn first_error(&self) -> Option<String> {
        self.checks()
            .into_iter()
            .find(|(_, check)| !check.valid)
            .map(|(_, check)| check.message)
    }

    /// Feedback to render under a field, positive messages included
    pub fn visible_check(&self, name: &str) -> Option<FieldCheck> {
        let field = self.by_name(name);
        if !(self.attempted || field.touched) {
            return None;
        }
        let check = self.check(name);
        (!check.message.is_empty()).then_some(check)
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new(Role::default())
    }
}

impl Form for AuthForm {
    fn field_count(&self) -> usize {
        self.field_names().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.field_names().get(self.active_field_index).copied() {
            Some("name") => &mut self.name,
            Some("password") => &mut self.password,
            Some("confirm") => &mut self.confirm,
            _ => &mut self.email,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.field_names()
            .get(index)
            .map(|name| self.by_name(name))
    }
}

// Contact Form
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: FormField,
    pub email: FormField,
    pub message: FormField,
    pub active_field_index: usize,
    pub attempted: bool,
    pub submitting: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text("name", "Your Name"),
            email: FormField::text("email", "Your Email"),
            message: FormField::text("message", "Message"),
            active_field_index: 0,
            attempted: false,
            submitting: false,
        }
    }

    pub fn check(&self, index: usize) -> FieldCheck {
        match index {
            0 => validate_required(self.name.as_text(), "Name is required"),
            1 => validate_email(self.email.as_text()),
            _ => validate_required(self.message.as_text(), "Message is required"),
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..self.field_count()).all(|i| self.check(i).valid)
    }

    pub fn first_error(&self) -> Option<String> {
        (0..self.field_count())
            .map(|i| self.check(i))
            .find(|check| !check.valid)
            .map(|check| check.message)
    }

    pub fn visible_error(&self, index: usize) -> Option<String> {
        let field = self.get_field(index)?;
        if !(self.attempted || field.touched) {
            return None;
        }
        let check = self.check(index);
        (!check.valid).then_some(check.message)
    }

    /// Clear every field after a successful send
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for ContactForm {
    fn field_count(&self) -> usize {
        3
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.name,
            1 => &mut self.email,
            _ => &mut self.message,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.name),
            1 => Some(&self.email),
            2 => Some(&self.message),
            _ => None,
        }
    }
}
