//! Session store trait

use async_trait::async_trait;

use crate::storage::StoreError;

/// Token -> identity mapping with native expiry
///
/// Adapters own the physical mapping only. TTL and token generation are
/// decided by the caller.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Bind `token` to `identity_id` for `ttl_secs`. Overwrites silently.
    async fn put(&self, token: &str, identity_id: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Identity bound to `token`; expired and never-issued tokens are both `None`
    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError>;

    /// Remove the mapping. Revoking an absent token is not an error.
    async fn revoke(&self, token: &str) -> Result<(), StoreError>;

    /// Health check
    async fn ping(&self) -> Result<(), StoreError>;
}
