//! Form domain layer
//!
//! Field values, validators, the onboarding wizards and the auth/contact
//! forms. Nothing here touches the terminal or the store.

mod farmer;
mod field;
mod form_state;
mod manufacturer;
pub mod options;
mod validators;
mod wizard;

pub use farmer::FarmerWizard;
pub use field::{FieldValue, FormField, InputFilter};
pub use form_state::{AuthForm, AuthMode, ContactForm, Form, WizardState};
pub use manufacturer::ManufacturerWizard;
pub use validators::*;
pub use wizard::{Wizard, WizardForm, STEPS};
