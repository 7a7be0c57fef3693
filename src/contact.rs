//! Contact form submission and admin moderation

use crate::error::StoreError;
use crate::profile::timestamp;
use crate::state::forms::ContactForm;
use crate::store::{Document, DocumentStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CONTACT_MESSAGES: &str = "contact_messages";

pub const THANK_YOU: &str = "Thank you for your message! We will get back to you soon.";

/// Read state of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Unread,
    Read,
}

/// A contact message as listed in the admin panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
    pub status: MessageStatus,
}

impl ContactMessage {
    /// Build from a stored document; missing fields become empty
    pub fn from_document(id: String, doc: &Document) -> Self {
        let text = |key: &str| {
            doc.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let status = match doc.get("status").and_then(Value::as_str) {
            Some("read") => MessageStatus::Read,
            _ => MessageStatus::Unread,
        };
        Self {
            id,
            name: text("name"),
            email: text("email"),
            message: text("message"),
            timestamp: text("timestamp"),
            status,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.status == MessageStatus::Unread
    }

    /// Timestamp rendered for the list, raw when unparseable
    pub fn received_at(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

/// Store a validated contact form; returns the new message id
pub async fn submit_contact(
    store: &dyn DocumentStore,
    form: &ContactForm,
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    let mut doc = Document::new();
    doc.insert("name".to_string(), json!(form.name.as_text().trim()));
    doc.insert("email".to_string(), json!(form.email.as_text().trim()));
    doc.insert("message".to_string(), json!(form.message.as_text().trim()));
    doc.insert("timestamp".to_string(), json!(timestamp(now)));
    doc.insert("status".to_string(), json!(MessageStatus::Unread));
    let id = store.add(CONTACT_MESSAGES, doc).await?;
    tracing::info!("Contact message {id} received");
    Ok(id)
}

/// All messages, newest first
pub async fn list_messages(store: &dyn DocumentStore) -> Result<Vec<ContactMessage>, StoreError> {
    let docs = store
        .list_ordered(CONTACT_MESSAGES, "timestamp", true)
        .await?;
    Ok(docs
        .into_iter()
        .map(|(id, doc)| ContactMessage::from_document(id, &doc))
        .collect())
}

/// Mark a message as read. Returns `false` when the message no longer exists.
pub async fn mark_read(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
    if store.get(CONTACT_MESSAGES, id).await?.is_none() {
        tracing::warn!("Message {id} is gone, not marking it read");
        return Ok(false);
    }
    let mut update = Document::new();
    update.insert("status".to_string(), json!(MessageStatus::Read));
    store.set(CONTACT_MESSAGES, id, update, true).await?;
    tracing::info!("Marked message {id} as read");
    Ok(true)
}

pub async fn delete_message(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete(CONTACT_MESSAGES, id).await?;
    tracing::info!("Deleted message {id}");
    Ok(())
}
