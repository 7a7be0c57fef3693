//! Profile hydration and submission
//!
//! A profile lives in two documents keyed by uid: the shared `users` entry
//! and the role collection entry (`farmers` or `manufacturers`). Both are
//! written with merge semantics so fields the wizard does not know about
//! survive a resubmission.

use crate::error::StoreError;
use crate::state::forms::Wizard;
use crate::state::Role;
use crate::store::{Document, DocumentStore, Identity};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

pub const USERS: &str = "users";

/// RFC 3339 UTC timestamp as stored in documents
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persisted profile for hydration: the users entry overlaid by the role
/// entry, with `name` falling back to the users display name.
pub async fn load_profile(
    store: &dyn DocumentStore,
    uid: &str,
    role: Role,
) -> Result<Option<Document>, StoreError> {
    let user = store.get(USERS, uid).await?;
    let role_doc = store.get(role.collection(), uid).await?;
    if user.is_none() && role_doc.is_none() {
        return Ok(None);
    }

    let mut merged = user.unwrap_or_default();
    let fallback_name = merged
        .get("displayName")
        .or_else(|| merged.get("name"))
        .cloned();
    merged.extend(role_doc.unwrap_or_default());
    let has_name = merged
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|n| !n.is_empty());
    if let (false, Some(name)) = (has_name, fallback_name) {
        merged.insert("name".to_string(), name);
    }
    Ok(Some(merged))
}

/// Whether the users entry marks the profile as complete
pub fn is_complete(user: &Document) -> bool {
    user.get("profileComplete")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Write the wizard's record for `identity`. The wizard itself is only
/// read, so a failed write leaves the record as the user left it.
pub async fn submit_profile(
    store: &dyn DocumentStore,
    identity: &Identity,
    wizard: &dyn Wizard,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let role = wizard.role();
    let stamp = timestamp(now);
    let record = wizard.to_record();

    let existing_role_doc = store.get(role.collection(), &identity.uid).await?;
    let mut role_doc = record.clone();
    role_doc.insert("userId".to_string(), json!(identity.uid));
    role_doc.insert("email".to_string(), json!(identity.email));
    role_doc.insert("role".to_string(), json!(role));
    role_doc.insert("status".to_string(), json!("active"));
    role_doc.insert("profileComplete".to_string(), json!(true));
    role_doc.insert("updatedAt".to_string(), json!(stamp));
    if !has_created_at(existing_role_doc.as_ref()) {
        role_doc.insert("createdAt".to_string(), json!(stamp));
    }
    // The users entry carries the routing flag, so it is written last: if it
    // fails the user lands in the wizard again and a resubmit repairs both.
    store
        .set(role.collection(), &identity.uid, role_doc, true)
        .await?;

    let existing_user = store.get(USERS, &identity.uid).await?;
    let mut user = Document::new();
    user.insert("uid".to_string(), json!(identity.uid));
    user.insert("email".to_string(), json!(identity.email));
    user.insert("role".to_string(), json!(role));
    if let Some(name) = record.get("name") {
        user.insert("name".to_string(), name.clone());
        user.insert("displayName".to_string(), name.clone());
    }
    if let Some(phone) = record.get("mobile").or_else(|| record.get("mobileNumber")) {
        user.insert("phoneNumber".to_string(), phone.clone());
    }
    if let Some(photo) = record
        .get("profilePhotoUrl")
        .or_else(|| record.get("companyLogo"))
    {
        user.insert("profilePhotoUrl".to_string(), photo.clone());
    }
    user.insert("profileComplete".to_string(), json!(true));
    user.insert("isActive".to_string(), json!(true));
    user.insert("updatedAt".to_string(), json!(stamp));
    if !has_created_at(existing_user.as_ref()) {
        user.insert("createdAt".to_string(), json!(stamp));
    }
    store.set(USERS, &identity.uid, user, true).await?;

    tracing::info!("Saved {} profile for {}", role, identity.uid);
    Ok(())
}

fn has_created_at(doc: Option<&Document>) -> bool {
    doc.is_some_and(|d| d.contains_key("createdAt"))
}
