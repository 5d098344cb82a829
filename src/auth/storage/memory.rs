//! In-memory session store (development and tests)

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::r#trait::SessionStore;
use crate::storage::StoreError;

#[derive(Debug, Clone)]
struct Entry {
    identity_id: String,
    expires_at: Instant,
}

/// Session store backed by a process-local map
///
/// Entries past their expiry are treated as absent and dropped lazily.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    offline: Arc<AtomicBool>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with `Unavailable` until reset
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory session store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, token: &str, identity_id: &str, ttl_secs: u64) -> Result<(), StoreError> {
        self.check_online()?;
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_secs))
            .ok_or_else(|| StoreError::Unavailable(format!("ttl of {}s is out of range", ttl_secs)))?;

        let mut entries = self.entries.write().await;
        // sweep tokens that will never be presented again
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.to_string(),
            Entry {
                identity_id: identity_id.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        self.check_online()?;
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => {
                    return Ok(Some(entry.identity_id.clone()));
                }
                Some(_) => {}
            }
        }

        // expired: evict
        let mut entries = self.entries.write().await;
        if entries.get(token).is_some_and(|e| e.expires_at <= now) {
            entries.remove(token);
        }
        Ok(None)
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries.write().await.remove(token);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}
