//! Document store abstraction
//!
//! Records live as JSON documents keyed by `(collection, id)`. Within a
//! collection, a top-level `email` field is unique.
//!
//! - `SqliteDocumentStore`: sqlx-backed store used by the server
//! - `MemoryDocumentStore`: in-process store for tests and local runs
//!
//! Callers go through [`Documents`], which maps typed records to and from
//! the stored JSON shape.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Store-level failures, shared by the document and session stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("corrupt document: {0}")]
    Corrupt(String),

    #[error("duplicate document id: {0}")]
    Duplicate(String),

    #[error("duplicate email in collection {0}")]
    DuplicateEmail(String),
}

impl StoreError {
    /// Outage or timeout; the caller may retry later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Bound a single store round-trip
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

/// Raw document store interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Health check
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new document; fails with `Duplicate` if the id is taken and
    /// `DuplicateEmail` if another document in the collection has the same `email`
    async fn insert(&self, collection: &str, id: &str, body: Value) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Exact match on the document's `email` field
    async fn find_by_email(&self, collection: &str, email: &str) -> Result<Option<Value>, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Replace the body of an existing document. Returns false if absent.
    /// The `email` uniqueness rule of `insert` applies.
    async fn replace(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError>;

    /// Returns false if absent
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;
}

/// A typed record stored in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Typed facade over a [`DocumentStore`] handle
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn DocumentStore>,
}

impl Documents {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn get<T: Document>(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_by_email<T: Document>(&self, email: &str) -> Result<Option<T>, StoreError> {
        self.store
            .find_by_email(T::COLLECTION, email)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn list<T: Document>(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn insert<T: Document>(&self, doc: &T) -> Result<(), StoreError> {
        self.store.insert(T::COLLECTION, doc.id(), encode(doc)?).await
    }

    pub async fn replace<T: Document>(&self, doc: &T) -> Result<bool, StoreError> {
        self.store.replace(T::COLLECTION, doc.id(), encode(doc)?).await
    }

    pub async fn delete<T: Document>(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn count<T: Document>(&self) -> Result<u64, StoreError> {
        self.store.count(T::COLLECTION).await
    }
}

fn encode<T: Serialize>(doc: &T) -> Result<Value, StoreError> {
    serde_json::to_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, StoreError> {
    serde_json::from_value(body).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id")]
        id: String,
        email: String,
        text: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, email: &str) -> Note {
        Note {
            id: id.to_string(),
            email: email.to_string(),
            text: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_typed_facade() {
        let docs = Documents::new(Arc::new(MemoryDocumentStore::new()));

        docs.insert(&note("n1", "a@x.com")).await.unwrap();
        docs.insert(&note("n2", "b@x.com")).await.unwrap();

        let found: Option<Note> = docs.find_by_email("b@x.com").await.unwrap();
        assert_eq!(found.unwrap().id, "n2");
        assert_eq!(docs.count::<Note>().await.unwrap(), 2);

        let mut edited = note("n1", "a@x.com");
        edited.text = "edited".to_string();
        assert!(docs.replace(&edited).await.unwrap());
        let fetched: Note = docs.get("n1").await.unwrap().unwrap();
        assert_eq!(fetched.text, "edited");

        assert!(docs.delete::<Note>("n1").await.unwrap());
        assert!(docs.get::<Note>("n1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert("notes", "bad", serde_json::json!({"_id": "bad"}))
            .await
            .unwrap();

        let docs = Documents::new(store);
        let result = docs.get::<Note>("bad").await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, StoreError>(())
        };

        let result = with_timeout(Duration::from_millis(10), slow).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
        assert!(result.unwrap_err().is_transient());
    }
}
