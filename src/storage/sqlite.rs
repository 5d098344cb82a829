//! SQLite-backed document store
//!
//! One `documents` table holds every collection; bodies are JSON text and the
//! email lookup goes through `json_extract`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::{with_timeout, DocumentStore, StoreError};

/// Document store over a sqlx SQLite pool
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    call_timeout: Duration,
}

impl SqliteDocumentStore {
    /// Connect and create the backing table if missing
    pub async fn connect(database_url: &str, call_timeout: Duration) -> Result<Self> {
        let is_memory = database_url.contains(":memory:");

        // Avoid logging the full URL; keep the scheme for diagnostics
        let scheme = database_url.split(':').next().unwrap_or("unknown");
        info!(scheme, is_memory, "connecting to document store");

        let mut connect_options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL format")?
            .create_if_missing(true);
        if !is_memory {
            connect_options = connect_options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // Every connection to `:memory:` is its own database, so pin the pool to one
        let max_connections = if is_memory { 1 } else { 10 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(call_timeout)
            .connect_with(connect_options)
            .await
            .context("Failed to connect to document store")?;

        let store = Self { pool, call_timeout };
        store.initialize_schema().await?;

        info!("Document store initialized");
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create documents table")?;

        // superseded by the unique index below
        sqlx::query("DROP INDEX IF EXISTS idx_documents_email")
            .execute(&self.pool)
            .await
            .context("Failed to drop legacy email index")?;

        // Documents without an email extract to NULL, and NULLs never collide
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} \
             ON documents (collection, json_extract(body, '$.email'))",
            EMAIL_INDEX
        ))
        .execute(&self.pool)
        .await
        .context("Failed to create email index")?;

        Ok(())
    }
}

/// Unique index enforcing one `email` per collection
const EMAIL_INDEX: &str = "idx_documents_unique_email";

/// Map a write failure, telling id collisions from email collisions
fn write_error(e: sqlx::Error, collection: &str, id: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.message().contains(EMAIL_INDEX) {
                StoreError::DuplicateEmail(collection.to_string())
            } else {
                StoreError::Duplicate(id.to_string())
            }
        }
        _ => unavailable(e),
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn parse_body(raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn render_body(body: &Value) -> Result<String, StoreError> {
    serde_json::to_string(body).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        with_timeout(self.call_timeout, async {
            sqlx::query_scalar::<_, i64>("SELECT 1")
                .fetch_one(&self.pool)
                .await
                .map(|_| ())
                .map_err(unavailable)
        })
        .await
    }

    async fn insert(&self, collection: &str, id: &str, body: Value) -> Result<(), StoreError> {
        let raw = render_body(&body)?;
        with_timeout(self.call_timeout, async {
            sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
                .bind(collection)
                .bind(id)
                .bind(&raw)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| write_error(e, collection, id))
        })
        .await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let row = with_timeout(self.call_timeout, async {
            sqlx::query_scalar::<_, String>("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(unavailable)
        })
        .await?;

        row.as_deref().map(parse_body).transpose()
    }

    async fn find_by_email(&self, collection: &str, email: &str) -> Result<Option<Value>, StoreError> {
        let row = with_timeout(self.call_timeout, async {
            sqlx::query_scalar::<_, String>(
                "SELECT body FROM documents \
                 WHERE collection = ? AND json_extract(body, '$.email') = ? LIMIT 1",
            )
            .bind(collection)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)
        })
        .await?;

        row.as_deref().map(parse_body).transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let rows = with_timeout(self.call_timeout, async {
            sqlx::query_scalar::<_, String>("SELECT body FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(unavailable)
        })
        .await?;

        rows.iter().map(|raw| parse_body(raw)).collect()
    }

    async fn replace(&self, collection: &str, id: &str, body: Value) -> Result<bool, StoreError> {
        let raw = render_body(&body)?;
        with_timeout(self.call_timeout, async {
            sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
                .bind(&raw)
                .bind(collection)
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|result| result.rows_affected() > 0)
                .map_err(|e| write_error(e, collection, id))
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        with_timeout(self.call_timeout, async {
            sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|result| result.rows_affected() > 0)
                .map_err(unavailable)
        })
        .await
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        with_timeout(self.call_timeout, async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE collection = ?")
                .bind(collection)
                .fetch_one(&self.pool)
                .await
                .map(|n| n.max(0) as u64)
                .map_err(unavailable)
        })
        .await
    }
}
