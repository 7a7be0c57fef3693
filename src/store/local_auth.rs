//! Local identity provider backed by the document store
//!
//! Accounts live in the `accounts` collection keyed by uid. Passwords are kept
//! only as a salted SHA-256 digest. The signed-in identity is mirrored to
//! `sessions/current` so a restarted client resumes the session.

use super::traits::{AuthProvider, Document, DocumentStore, Identity};
use crate::error::AuthError;
use crate::state::forms::is_valid_email;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

const ACCOUNTS: &str = "accounts";
const PASSWORD_RESETS: &str = "password_resets";
const SESSIONS: &str = "sessions";
const CURRENT_SESSION: &str = "current";

/// Consecutive wrong passwords before sign-in is refused
const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Minimum password length accepted by the provider itself
const MIN_PASSWORD_LEN: usize = 6;

/// Identity provider that stores credentials next to the application data
pub struct LocalAuth {
    store: Arc<dyn DocumentStore>,
    current: Mutex<Option<Identity>>,
    failed_attempts: Mutex<HashMap<String, u32>>,
}

impl LocalAuth {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            current: Mutex::new(None),
            failed_attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Build a provider and restore the session persisted by a previous run
    pub async fn open(store: Arc<dyn DocumentStore>) -> Result<Self, AuthError> {
        let auth = Self::new(store);
        let Some(session) = auth.store.get(SESSIONS, CURRENT_SESSION).await? else {
            return Ok(auth);
        };

        let uid = session.get("uid").and_then(Value::as_str).unwrap_or("");
        let email = session.get("email").and_then(Value::as_str).unwrap_or("");
        // The account may have been removed since the session was written
        if uid.is_empty() || auth.store.get(ACCOUNTS, uid).await?.is_none() {
            tracing::warn!("Discarding stale session for {email}");
            auth.store.delete(SESSIONS, CURRENT_SESSION).await?;
            return Ok(auth);
        }

        tracing::info!("Restored session for {email}");
        auth.set_current(Some(Identity {
            uid: uid.to_string(),
            email: email.to_string(),
        }));
        Ok(auth)
    }

    /// Make `identity` the signed-in user here and in the persisted session
    async fn start_session(&self, identity: &Identity) -> Result<(), AuthError> {
        let mut session = Document::new();
        session.insert("uid".to_string(), json!(identity.uid));
        session.insert("email".to_string(), json!(identity.email));
        session.insert("signedInAt".to_string(), json!(Utc::now().to_rfc3339()));
        self.store
            .set(SESSIONS, CURRENT_SESSION, session, false)
            .await?;
        self.set_current(Some(identity.clone()));
        Ok(())
    }

    fn hash_password(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    async fn find_account(&self, email: &str) -> Result<Option<(String, Document)>, AuthError> {
        let mut found = self
            .store
            .find_by_field(ACCOUNTS, "email", &Value::String(email.to_string()))
            .await?;
        Ok(found.pop())
    }

    fn set_current(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = identity;
    }

    fn failures_for(&self, email: &str) -> u32 {
        self.failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .copied()
            .unwrap_or(0)
    }

    fn record_failure(&self, email: &str) {
        *self
            .failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(email.to_string())
            .or_insert(0) += 1;
    }

    fn clear_failures(&self, email: &str) {
        self.failed_attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(email);
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    fn current_user(&self) -> Option<Identity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let Some((uid, account)) = self.find_account(email).await? else {
            return Err(AuthError::UserNotFound);
        };

        if self.failures_for(email) >= MAX_FAILED_ATTEMPTS {
            tracing::warn!("Sign-in locked for {email} after repeated failures");
            return Err(AuthError::TooManyRequests);
        }

        let salt = account.get("salt").and_then(Value::as_str).unwrap_or("");
        let expected = account
            .get("passwordHash")
            .and_then(Value::as_str)
            .unwrap_or("");
        if Self::hash_password(salt, password) != expected {
            self.record_failure(email);
            return Err(AuthError::WrongPassword);
        }

        self.clear_failures(email);
        let identity = Identity {
            uid,
            email: email.to_string(),
        };
        self.start_session(&identity).await?;
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.find_account(email).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        let uid = uuid::Uuid::new_v4().simple().to_string();
        let salt = uuid::Uuid::new_v4().to_string();
        let account = json!({
            "email": email,
            "salt": salt,
            "passwordHash": Self::hash_password(&salt, password),
            "createdAt": Utc::now().to_rfc3339(),
        });
        if let Value::Object(doc) = account {
            self.store.set(ACCOUNTS, &uid, doc, false).await?;
        }

        let identity = Identity {
            uid,
            email: email.to_string(),
        };
        self.start_session(&identity).await?;
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if self.find_account(email).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }
        let mut request = Document::new();
        request.insert("email".to_string(), json!(email));
        request.insert("requestedAt".to_string(), json!(Utc::now().to_rfc3339()));
        self.store.add(PASSWORD_RESETS, request).await?;
        self.clear_failures(email);
        tracing::info!("Password reset requested for {email}");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        self.store.delete(SESSIONS, CURRENT_SESSION).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;

    fn provider() -> LocalAuth {
        LocalAuth::new(Arc::new(JsonFileStore::in_memory()))
    }

    #[tokio::test]
    async fn test_create_then_sign_in() {
        let auth = provider();
        let created = auth.create_account("asha@farm.in", "Secret1!").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());

        let signed_in = auth.sign_in("asha@farm.in", "Secret1!").await.unwrap();
        assert_eq!(created.uid, signed_in.uid);
        assert_eq!(auth.current_user(), Some(signed_in));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let auth = provider();
        auth.create_account("asha@farm.in", "Secret1!").await.unwrap();
        let err = auth
            .create_account("asha@farm.in", "Other1!!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[tokio::test]
    async fn test_weak_and_invalid_inputs_rejected() {
        let auth = provider();
        assert!(matches!(
            auth.create_account("asha@farm.in", "abc").await,
            Err(AuthError::WeakPassword)
        ));
        assert!(matches!(
            auth.create_account("not-an-email", "Secret1!").await,
            Err(AuthError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_then_lockout() {
        let auth = provider();
        auth.create_account("asha@farm.in", "Secret1!").await.unwrap();

        for _ in 0..MAX_FAILED_ATTEMPTS {
            assert!(matches!(
                auth.sign_in("asha@farm.in", "nope").await,
                Err(AuthError::WrongPassword)
            ));
        }
        assert!(matches!(
            auth.sign_in("asha@farm.in", "Secret1!").await,
            Err(AuthError::TooManyRequests)
        ));

        auth.send_password_reset("asha@farm.in").await.unwrap();
        assert!(auth.sign_in("asha@farm.in", "Secret1!").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let auth = provider();
        assert!(matches!(
            auth.sign_in("ghost@farm.in", "Secret1!").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            auth.send_password_reset("ghost@farm.in").await,
            Err(AuthError::UserNotFound)
        ));
    }

    mod session {
        use super::*;
        use pretty_assertions::assert_eq;

        async fn file_store(path: &std::path::Path) -> Arc<dyn DocumentStore> {
            Arc::new(JsonFileStore::open(path).await.unwrap())
        }

        #[tokio::test]
        async fn test_session_survives_restart() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");

            let first = LocalAuth::open(file_store(&path).await).await.unwrap();
            assert!(first.current_user().is_none());
            let created = first.create_account("asha@farm.in", "Secret1!").await.unwrap();
            drop(first);

            let second = LocalAuth::open(file_store(&path).await).await.unwrap();
            assert_eq!(second.current_user(), Some(created));
        }

        #[tokio::test]
        async fn test_sign_in_persists_and_sign_out_clears() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");

            let first = LocalAuth::open(file_store(&path).await).await.unwrap();
            first.create_account("asha@farm.in", "Secret1!").await.unwrap();
            first.sign_out().await.unwrap();
            let signed_in = first.sign_in("asha@farm.in", "Secret1!").await.unwrap();

            let second = LocalAuth::open(file_store(&path).await).await.unwrap();
            assert_eq!(second.current_user(), Some(signed_in));

            second.sign_out().await.unwrap();
            let third = LocalAuth::open(file_store(&path).await).await.unwrap();
            assert!(third.current_user().is_none());
        }

        #[tokio::test]
        async fn test_session_for_missing_account_is_discarded() {
            let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::in_memory());
            let mut session = Document::new();
            session.insert("uid".to_string(), json!("ghost"));
            session.insert("email".to_string(), json!("ghost@farm.in"));
            store
                .set(SESSIONS, CURRENT_SESSION, session, false)
                .await
                .unwrap();

            let auth = LocalAuth::open(store.clone()).await.unwrap();
            assert!(auth.current_user().is_none());
            assert!(store.get(SESSIONS, CURRENT_SESSION).await.unwrap().is_none());
        }
    }

    #[test]
    fn test_hash_depends_on_salt() {
        let a = LocalAuth::hash_password("salt-a", "Secret1!");
        let b = LocalAuth::hash_password("salt-b", "Secret1!");
        assert_ne!(a, b);
        assert_eq!(a, LocalAuth::hash_password("salt-a", "Secret1!"));
    }
}
