//! Persistence and identity collaborators
//!
//! The client talks to storage only through [`DocumentStore`] and to the
//! session only through [`AuthProvider`], so every flow can run against an
//! in-memory store or a mock.

mod json_store;
mod local_auth;
mod traits;

pub use json_store::JsonFileStore;
pub use local_auth::LocalAuth;
pub use traits::{AuthProvider, Document, DocumentStore, Identity};

#[cfg(test)]
pub use traits::{MockAuthProvider, MockDocumentStore};
