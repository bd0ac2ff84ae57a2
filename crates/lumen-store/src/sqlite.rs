//! # SQLite Storage Backend
//!
//! The device-durable implementation of the storage port.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     SQLite Record Store                             │
//! │                                                                     │
//! │  Host app startup                                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreConfig::new(path) ← configure pool settings                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SqliteStore::new(config).await ← create pool + run migrations      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  local_records table                                                │
//! │  ┌──────────────────────────┬──────────────────┬────────────┐      │
//! │  │ record_key               │ record_value     │ updated_at │      │
//! │  ├──────────────────────────┼──────────────────┼────────────┤      │
//! │  │ checkout.draft           │ {...draft json}  │ ...        │      │
//! │  │ checkout.offline_queue   │ [...entries]     │ ...        │      │
//! │  └──────────────────────────┴──────────────────┴────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL (Write-Ahead Logging) is enabled for better crash recovery; the
//! terminal writes a snapshot on every draft mutation, so write latency
//! matters more than read concurrency here.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::port::StoragePort;

/// Embedded migrations for the record store.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// =============================================================================
// Configuration
// =============================================================================

/// SQLite store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/terminal.db").max_connections(2);
/// let store = SqliteStore::new(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one writer, one reader is plenty for a terminal)
    pub max_connections: u32,

    /// Connection acquisition timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a configuration with the given database path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 2,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// In-memory database configuration (for tests).
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // in-memory requires a single connection
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// SQLite-backed record store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates the pool, applies pragmas, and runs migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL journal mode and NORMAL synchronous
    /// 3. Creates the connection pool
    /// 4. Runs embedded migrations (if enabled)
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing local record store"
        );

        // ":memory:" gets its own URL form; everything else is a file path
        // created on first use.
        let connect_url = if config.database_path == PathBuf::from(":memory:") {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", config.database_path.display())
        };

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = SqliteStore { pool };

        if config.run_migrations {
            debug!("Running record store migrations");
            MIGRATOR.run(&store.pool).await?;
        }

        Ok(store)
    }

    /// Checks that the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Call on application shutdown.
    pub async fn close(&self) {
        info!("Closing local record store");
        self.pool.close().await;
    }
}

#[async_trait]
impl StoragePort for SqliteStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let row = sqlx::query("SELECT record_value FROM local_records WHERE record_key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(row.try_get::<String, _>("record_value")?),
            None => None,
        })
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO local_records (record_key, record_value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(record_key) DO UPDATE SET
                record_value = excluded.record_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM local_records WHERE record_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_health() {
        let store = SqliteStore::new(StoreConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_record_roundtrip_and_overwrite() {
        let store = SqliteStore::new(StoreConfig::in_memory()).await.unwrap();

        assert_eq!(store.read("checkout.draft").await.unwrap(), None);

        store.write("checkout.draft", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            store.read("checkout.draft").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        store.write("checkout.draft", r#"{"a":2}"#).await.unwrap();
        assert_eq!(
            store.read("checkout.draft").await.unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );

        store.delete("checkout.draft").await.unwrap();
        assert_eq!(store.read("checkout.draft").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/terminal.db").max_connections(4);
        assert_eq!(config.max_connections, 4);
        assert!(config.run_migrations);
    }
}
