//! # Draft Snapshot Store
//!
//! Restart-durable persistence of the in-progress sale.
//!
//! ## Snapshot Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Draft Snapshot                                  │
//! │                                                                     │
//! │  Every draft mutation ──► save() ──► full JSON under the fixed      │
//! │                                      'checkout.draft' key           │
//! │                                                                     │
//! │  Terminal start ──► load() ──► restore the interrupted sale, or     │
//! │                                start empty                          │
//! │                                                                     │
//! │  Successful commit / enqueue ──► clear()                            │
//! │                                                                     │
//! │  This is crash/reload recovery for ONE session-scoped draft; it is  │
//! │  distinct from, and unrelated to, the offline durable queue.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::port::StoragePort;
use lumen_core::SaleDraft;

/// Fixed storage key of the session-scoped draft snapshot.
pub const DRAFT_KEY: &str = "checkout.draft";

/// Persists the full SaleDraft through the injected storage port.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn StoragePort>,
}

impl DraftStore {
    /// Creates a draft store over the given storage port.
    pub fn new(store: Arc<dyn StoragePort>) -> Self {
        DraftStore { store }
    }

    /// Serializes the entire draft and replaces the snapshot.
    pub async fn save(&self, draft: &SaleDraft) -> StoreResult<()> {
        let json = serde_json::to_string(draft)?;
        self.store.write(DRAFT_KEY, &json).await?;
        debug!(step = draft.step.number(), "Draft snapshot saved");
        Ok(())
    }

    /// Loads the snapshot left by a previous session, if any.
    ///
    /// A snapshot that no longer deserializes (left by an incompatible
    /// build) is treated as absent rather than blocking terminal start;
    /// the corrupt record is logged and dropped.
    pub async fn load(&self) -> StoreResult<Option<SaleDraft>> {
        let Some(json) = self.store.read(DRAFT_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<SaleDraft>(&json) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable draft snapshot");
                self.store.delete(DRAFT_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Removes the snapshot after a successful commit or enqueue.
    pub async fn clear(&self) -> StoreResult<()> {
        self.store.delete(DRAFT_KEY).await?;
        debug!("Draft snapshot cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryStore;
    use chrono::NaiveDate;
    use lumen_core::types::DeliveryTerm;

    fn draft() -> SaleDraft {
        let mut d = SaleDraft::new("matriz", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        d.add_item("p1", "Sofa", 10_000);
        d.set_delivery_term(DeliveryTerm::Days15);
        d.set_notes("deliver after noon");
        d
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let store = DraftStore::new(Arc::new(MemoryStore::new()));
        let original = draft();

        store.save(&original).await.unwrap();
        let restored = store.load().await.unwrap().unwrap();

        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn test_load_without_snapshot() {
        let store = DraftStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot() {
        let store = DraftStore::new(Arc::new(MemoryStore::new()));
        store.save(&draft()).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_dropped() {
        let backing = Arc::new(MemoryStore::new());
        backing.write(DRAFT_KEY, "{not valid json").await.unwrap();

        let store = DraftStore::new(backing.clone());
        assert!(store.load().await.unwrap().is_none());
        // The corrupt record is gone
        assert!(backing.read(DRAFT_KEY).await.unwrap().is_none());
    }
}
