//! # Storage Port
//!
//! The injected abstraction over local persistence.
//!
//! ## Why a Port?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Storage Port                                 │
//! │                                                                     │
//! │  DraftStore ─────┐                                                  │
//! │                  ├──► dyn StoragePort ──┬──► SqliteStore (device)   │
//! │  OfflineQueue ───┘                      └──► MemoryStore  (tests)   │
//! │                                                                     │
//! │  The draft snapshot and the offline queue are both structured-text  │
//! │  records under fixed keys. The port keeps them storage-agnostic     │
//! │  and lets every consumer be exercised against the in-memory         │
//! │  backend without touching disk.                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Port Trait
// =============================================================================

/// Restart-durable storage of structured-text records under fixed keys.
///
/// Implementations must persist across application reloads (not across
/// device loss) and keep each key's value as an opaque text blob.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Reads the record under `key`, if present.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes (inserts or replaces) the record under `key`.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes the record under `key`. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// In-memory storage backend.
///
/// ## Usage
/// Backs unit tests across the workspace; also usable as a scratch store
/// for ephemeral embedders. Writes can be toggled to fail so the
/// quota-exceeded path is testable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every subsequent write fail with a quota error.
    ///
    /// Simulates the storage-full condition for tests.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoragePort for MemoryStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::QuotaExceeded(
                "simulated: storage is full".to_string(),
            ));
        }
        self.records
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.records.lock().await.remove(key);
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
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        assert_eq!(store.read("k").await.unwrap(), None);

        store.write("k", "v1").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v1"));

        store.write("k", "v2").await.unwrap();
        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("v2"));

        store.delete("k").await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.delete("absent").await.unwrap();
    }

    #[tokio::test]
    async fn test_fail_writes_surfaces_quota_error() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let err = store.write("k", "v").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded(_)));

        store.set_fail_writes(false);
        store.write("k", "v").await.unwrap();
    }
}
