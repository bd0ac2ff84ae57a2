//! # Offline Durable Queue
//!
//! The device-scoped, append/remove-only store of fully-formed sale
//! payloads awaiting submission.
//!
//! ## Queue Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Offline Durable Queue                           │
//! │                                                                     │
//! │  enqueue(draft)                                                     │
//! │    ├── assigns offline_id from the local timestamp                  │
//! │    ├── appends to the persisted JSON list                           │
//! │    └── on storage failure: the sale is NOT treated as committed     │
//! │                                                                     │
//! │  list()   ── insertion order, re-read from storage on every call    │
//! │  remove() ── deletes exactly one entry, only after a confirmed      │
//! │              remote commit                                          │
//! │                                                                     │
//! │  NO update primitive: entries are immutable between enqueue and     │
//! │  removal.                                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::port::StoragePort;
use lumen_core::SaleDraft;

/// Fixed storage key of the device-scoped offline queue.
pub const QUEUE_KEY: &str = "checkout.offline_queue";

// =============================================================================
// Queue Entry
// =============================================================================

/// An immutable snapshot of a SaleDraft awaiting online submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineQueueEntry {
    /// Local-timestamp identifier; collision-free because the terminal
    /// serializes finalize calls.
    pub offline_id: String,

    /// The placeholder order number shown to the operator ("OFF-####").
    /// Replaced by a fresh online allocation during drain.
    pub order_number: String,

    /// When the sale was enqueued.
    pub enqueued_at: DateTime<Utc>,

    /// The full sale as it stood at finalize.
    pub draft: SaleDraft,
}

// =============================================================================
// Offline Queue
// =============================================================================

/// Append/remove-only queue persisted as one JSON list under a fixed key.
#[derive(Clone)]
pub struct OfflineQueue {
    store: Arc<dyn StoragePort>,
}

impl OfflineQueue {
    /// Creates a queue over the given storage port.
    pub fn new(store: Arc<dyn StoragePort>) -> Self {
        OfflineQueue { store }
    }

    /// Appends a finalized sale to the queue and persists it.
    ///
    /// ## Arguments
    /// * `draft` - the sale exactly as finalized
    /// * `order_number` - the offline placeholder allocated for display
    ///
    /// ## Errors
    /// Serialization or storage failures bubble up unchanged; the caller
    /// must surface them as a blocking alert and keep the draft alive.
    pub async fn enqueue(
        &self,
        draft: &SaleDraft,
        order_number: &str,
    ) -> StoreResult<OfflineQueueEntry> {
        let now = Utc::now();
        let entry = OfflineQueueEntry {
            offline_id: now.timestamp_millis().to_string(),
            order_number: order_number.to_string(),
            enqueued_at: now,
            draft: draft.clone(),
        };

        let mut entries = self.load_entries().await?;
        entries.push(entry.clone());
        self.persist_entries(&entries).await?;

        info!(
            offline_id = %entry.offline_id,
            order_number = %entry.order_number,
            pending = entries.len(),
            "Sale enqueued for later submission"
        );

        Ok(entry)
    }

    /// Returns all queued entries in insertion order.
    ///
    /// Always re-read from persisted storage, never cached.
    pub async fn list(&self) -> StoreResult<Vec<OfflineQueueEntry>> {
        self.load_entries().await
    }

    /// Deletes exactly one entry after its confirmed remote commit.
    pub async fn remove(&self, offline_id: &str) -> StoreResult<()> {
        let mut entries = self.load_entries().await?;
        let before = entries.len();
        entries.retain(|e| e.offline_id != offline_id);

        if entries.len() == before {
            return Err(StoreError::EntryNotFound {
                offline_id: offline_id.to_string(),
            });
        }

        self.persist_entries(&entries).await?;
        debug!(offline_id = %offline_id, pending = entries.len(), "Queue entry removed");
        Ok(())
    }

    /// Number of sales awaiting submission, for the operator banner.
    pub async fn pending_count(&self) -> StoreResult<usize> {
        Ok(self.load_entries().await?.len())
    }

    async fn load_entries(&self) -> StoreResult<Vec<OfflineQueueEntry>> {
        match self.store.read(QUEUE_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist_entries(&self, entries: &[OfflineQueueEntry]) -> StoreResult<()> {
        let json = serde_json::to_string(entries)?;
        self.store.write(QUEUE_KEY, &json).await
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

    fn draft(product: &str) -> SaleDraft {
        let mut d = SaleDraft::new("matriz", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        d.add_item(product, "Item", 5_000);
        d.set_delivery_term(DeliveryTerm::Days15);
        d
    }

    fn queue() -> (OfflineQueue, Arc<MemoryStore>) {
        let backing = Arc::new(MemoryStore::new());
        (OfflineQueue::new(backing.clone()), backing)
    }

    #[tokio::test]
    async fn test_enqueue_then_list_roundtrips_the_draft() {
        let (queue, _) = queue();
        let d = draft("p1");

        let entry = queue.enqueue(&d, "OFF-1234").await.unwrap();
        let listed = queue.list().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].offline_id, entry.offline_id);
        assert_eq!(listed[0].order_number, "OFF-1234");
        assert_eq!(listed[0].draft, d);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (queue, _) = queue();

        queue.enqueue(&draft("p1"), "OFF-0001").await.unwrap();
        queue.enqueue(&draft("p2"), "OFF-0002").await.unwrap();
        queue.enqueue(&draft("p3"), "OFF-0003").await.unwrap();

        let refs: Vec<String> = queue
            .list()
            .await
            .unwrap()
            .iter()
            .map(|e| e.draft.line_items[0].product_ref.clone())
            .collect();
        assert_eq!(refs, ["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_remove_deletes_exactly_one() {
        let (queue, _) = queue();

        let first = queue.enqueue(&draft("p1"), "OFF-0001").await.unwrap();
        queue.enqueue(&draft("p2"), "OFF-0002").await.unwrap();

        queue.remove(&first.offline_id).await.unwrap();

        let remaining = queue.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|e| e.offline_id != first.offline_id));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_errors() {
        let (queue, _) = queue();
        let err = queue.remove("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::EntryNotFound { .. }));
    }

    #[tokio::test]
    async fn test_enqueue_failure_leaves_queue_untouched() {
        let (queue, backing) = queue();
        queue.enqueue(&draft("p1"), "OFF-0001").await.unwrap();

        backing.set_fail_writes(true);
        let err = queue.enqueue(&draft("p2"), "OFF-0002").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded(_)));

        backing.set_fail_writes(false);
        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pending_count() {
        let (queue, _) = queue();
        assert_eq!(queue.pending_count().await.unwrap(), 0);

        queue.enqueue(&draft("p1"), "OFF-0001").await.unwrap();
        queue.enqueue(&draft("p2"), "OFF-0002").await.unwrap();
        assert_eq!(queue.pending_count().await.unwrap(), 2);
    }
}
