//! Redis-backed session store

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::r#trait::SessionStore;
use crate::storage::{with_timeout, StoreError};

/// Key prefix for token mappings
pub const TOKEN_KEY_PREFIX: &str = "auth_";

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_BACKOFF_MS: u64 = 500;

/// Session store over a Redis `ConnectionManager`
///
/// Tokens are stored as `auth_<token> -> identity id` with a native TTL
/// (`SET .. EX ..`), so expiry needs no polling. The manager multiplexes and
/// reconnects; each call clones it and is bounded by `call_timeout`.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection_manager: ConnectionManager,
    call_timeout: Duration,
}

impl RedisSessionStore {
    /// Connect with a short linear backoff, then verify with PING
    pub async fn connect(redis_url: &str, call_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| anyhow::anyhow!("invalid redis url: {}", e))?;

        let mut failures = Vec::new();
        for attempt in 0..CONNECT_ATTEMPTS {
            if attempt > 0 {
                sleep(Duration::from_millis(CONNECT_BACKOFF_MS * attempt as u64)).await;
            }

            let created = tokio::time::timeout(
                call_timeout * 5,
                ConnectionManager::new(client.clone()),
            )
            .await;

            let connection_manager = match created {
                Ok(Ok(manager)) => manager,
                Ok(Err(e)) => {
                    warn!(attempt = attempt + 1, error = %e, "redis connection attempt failed");
                    failures.push(e.to_string());
                    continue;
                }
                Err(_) => {
                    warn!(attempt = attempt + 1, "redis connection attempt timed out");
                    failures.push("connect timed out".to_string());
                    continue;
                }
            };

            let store = Self {
                connection_manager,
                call_timeout,
            };
            match store.ping().await {
                Ok(()) => {
                    info!(attempt = attempt + 1, "redis session store connected");
                    return Ok(store);
                }
                Err(e) => failures.push(format!("ping failed: {}", e)),
            }
        }

        anyhow::bail!(
            "failed to connect to redis after {} attempts: {}",
            CONNECT_ATTEMPTS,
            failures.join("; ")
        )
    }

    fn key(token: &str) -> String {
        format!("{}{}", TOKEN_KEY_PREFIX, token)
    }
}

fn unavailable(err: RedisError) -> StoreError {
    StoreError::Unavailable(format!("redis: {}", err))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, token: &str, identity_id: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();
        let key = Self::key(token);

        with_timeout(self.call_timeout, async {
            let _: () = redis::cmd("SET")
                .arg(&key)
                .arg(identity_id)
                .arg("EX")
                .arg(ttl_secs)
                .query_async(&mut conn)
                .await
                .map_err(unavailable)?;
            Ok(())
        })
        .await
    }

    async fn resolve(&self, token: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection_manager.clone();
        let key = Self::key(token);

        with_timeout(self.call_timeout, async {
            let identity_id: Option<String> = redis::cmd("GET")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .map_err(unavailable)?;
            Ok(identity_id)
        })
        .await
    }

    async fn revoke(&self, token: &str) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();
        let key = Self::key(token);

        with_timeout(self.call_timeout, async {
            let _removed: u64 = redis::cmd("DEL")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .map_err(unavailable)?;
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();

        with_timeout(self.call_timeout, async {
            let _: String = redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map_err(unavailable)?;
            Ok(())
        })
        .await
    }
}
