//! Trait abstractions for the document store and identity provider to enable mocking in tests

use crate::error::{AuthError, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: a flat map of field name to JSON value
pub type Document = Map<String, Value>;

/// The signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Keyed document store operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single document by key
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Write a single document by key.
    /// With `merge`, only the supplied top-level fields are upserted.
    async fn set(
        &self,
        collection: &str,
        key: &str,
        doc: Document,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Insert a document under a generated key and return the key
    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Delete a document by key. Deleting a missing key succeeds.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// All documents whose `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// All documents ordered by `field`; documents without the field sort last
    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        descending: bool,
    ) -> Result<Vec<(String, Document)>, StoreError>;
}

/// Authentication and session operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The currently signed-in user, if any
    fn current_user(&self) -> Option<Identity>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create a new account and sign it in
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Request a password reset for the account
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), AuthError>;
}
