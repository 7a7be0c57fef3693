//! Error types shared across the client
//!
//! Field validation never produces an error value; see `state::forms::FieldCheck`.

use thiserror::Error;

/// Failure to load the state/district reference data
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("Failed to load states data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load states data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to load states data: no states found")]
    Empty,
}

/// Failure talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure from the identity provider or the auth flows built on it
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No account found with this email address")]
    UserNotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Too many failed login attempts. Please try again later or reset your password")]
    TooManyRequests,
    #[error("This email is already in use")]
    EmailInUse,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    #[error("Network error. Please check your connection and try again")]
    Network,
    #[error("This email is registered as a {registered}, not a {requested}")]
    RoleMismatch { registered: String, requested: String },
    #[error("This email is already registered as a {role}")]
    AlreadyRegistered { role: String },
    #[error("{0}")]
    Invalid(String),
    #[error("Error: {0}")]
    Store(#[from] StoreError),
}

/// Failure attaching an image file
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Please upload an image file")]
    NotAnImage,
    #[error("Image size should be less than {max_mb}MB")]
    TooLarge { max_mb: u64 },
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
