//! JSON-file backed document store
//!
//! All collections live in memory and are flushed to a single JSON file after
//! every mutation. The file is replaced through a temporary sibling so a crash
//! mid-write never leaves a truncated store behind. A mutation only becomes
//! visible in memory once its flush has succeeded.

use super::traits::{Document, DocumentStore};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

type Collections = BTreeMap<String, BTreeMap<String, Document>>;

/// Document store persisted as one JSON file
pub struct JsonFileStore {
    /// Backing file, `None` for a purely in-memory store
    path: Option<PathBuf>,
    collections: RwLock<Collections>,
}

impl JsonFileStore {
    /// Create a store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            collections: RwLock::new(Collections::new()),
        }
    }

    /// Open (or create) a store backed by the given file
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collections = match tokio::fs::read_to_string(&path).await {
            Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            Ok(_) => Collections::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "Opened document store at {} ({} collections)",
            path.display(),
            collections.len()
        );

        Ok(Self {
            path: Some(path),
            collections: RwLock::new(collections),
        })
    }

    /// Backing file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(collections)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Order two optional field values: strings lexically, numbers numerically,
/// missing values after present ones.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        tracing::debug!("get {collection}/{key}");
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        doc: Document,
        merge: bool,
    ) -> Result<(), StoreError> {
        tracing::debug!("set {collection}/{key} (merge={merge})");
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        let docs = next.entry(collection.to_string()).or_default();
        match docs.get_mut(key) {
            Some(existing) if merge => existing.extend(doc),
            _ => {
                docs.insert(key.to_string(), doc);
            }
        }
        self.persist(&next).await?;
        *collections = next;
        Ok(())
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("add {collection}/{id}");
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        next.entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        self.persist(&next).await?;
        *collections = next;
        Ok(id)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        tracing::debug!("delete {collection}/{key}");
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        let removed = next
            .get_mut(collection)
            .and_then(|docs| docs.remove(key))
            .is_some();
        if removed {
            self.persist(&next).await?;
            *collections = next;
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        descending: bool,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<(String, Document)> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|(_, a), (_, b)| {
            let (fa, fb) = (a.get(field), b.get(field));
            match (fa, fb, descending) {
                // Missing fields stay last regardless of direction
                (Some(_), Some(_), true) => compare_field(fb, fa),
                _ => compare_field(fa, fb),
            }
        });
        Ok(docs)
    }
}
