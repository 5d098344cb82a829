//! In-memory document store (for development and tests)

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocumentStore, StoreError};

/// collection -> (id -> body)
type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    offline: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with `StoreError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

fn email_of(body: &Value) -> Option<&str> {
    body.get("email").and_then(Value::as_str)
}

/// True if a document other than `id` already holds the email in `body`
fn email_taken(docs: &BTreeMap<String, Value>, id: &str, body: &Value) -> bool {
    match email_of(body) {
        Some(email) => docs
            .iter()
            .any(|(other_id, other)| other_id != id && email_of(other) == Some(email)),
        None => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }

    async fn insert(&self, collection: &str, id: &str, body: Value) -> Result<(), StoreError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(id) {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        if email_taken(docs, id, &body) {
            return Err(StoreError::DuplicateEmail(collection.to_string()));
        }
        docs.insert(id.to_string(), body);

        debug!(collection, id, "document inserted");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn find_by_email(&self, collection: &str, email: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| {
            docs.values()
                .find(|body| email_of(body) == Some(email))
                .cloned()
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn replace(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        if !docs.contains_key(id) {
            return Ok(false);
        }
        if email_taken(docs, id, &body) {
            return Err(StoreError::DuplicateEmail(collection.to_string()));
        }
        docs.insert(id.to_string(), body);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(|docs| docs.len() as u64).unwrap_or(0))
    }
}
