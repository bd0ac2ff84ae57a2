//! # Sync Reconciler
//!
//! Drains the offline durable queue through the shared commit path when
//! the operator asks for it.
//!
//! ## Drain Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         drain()                                     │
//! │                                                                     │
//! │  For each queued entry, in insertion order:                         │
//! │                                                                     │
//! │  1. Strip offline-only fields (offline_id, enqueued_at,             │
//! │     placeholder order number)                                       │
//! │  2. Submit through the SAME commit path as a live finalize —        │
//! │     a fresh online order number is allocated; the "OFF-" form is    │
//! │     never reused                                                    │
//! │  3. Success ──► remove(offline_id)                                  │
//! │  4. Failure ──► leave queued, continue with the next entry          │
//! │                                                                     │
//! │  One aggregate failure count is reported at the end of the pass.    │
//! │  Stock and delivery side-effects happen inside the commit path,     │
//! │  once per successfully submitted entry — never here.                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{error, info, warn};

use crate::commit::CommitPipeline;
use crate::error::SyncResult;
use lumen_store::OfflineQueue;

// =============================================================================
// Drain Report
// =============================================================================

/// One entry that stayed queued after a failed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainFailure {
    /// Offline id of the entry still in the queue.
    pub offline_id: String,

    /// Operator-facing description of what went wrong.
    pub error: String,
}

/// Aggregate outcome of one drain pass, reported to the operator once the
/// pass completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries successfully submitted (and removed from the queue).
    pub submitted: usize,

    /// Entries that failed and stayed queued.
    pub failures: Vec<DrainFailure>,
}

impl DrainReport {
    /// Number of entries that failed this pass.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted entry went through.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// =============================================================================
// Sync Reconciler
// =============================================================================

/// Replays queued offline sales against the system of record.
#[derive(Clone)]
pub struct SyncReconciler {
    queue: OfflineQueue,
    pipeline: CommitPipeline,
}

impl SyncReconciler {
    /// Creates a reconciler over the queue and the shared commit path.
    pub fn new(queue: OfflineQueue, pipeline: CommitPipeline) -> Self {
        SyncReconciler { queue, pipeline }
    }

    /// Runs one operator-triggered drain pass.
    ///
    /// Never auto-invoked on reconnect; the operator decides when to
    /// replay, so a reconnect can't double-submit a sale mid-edit.
    ///
    /// ## Failure Handling
    /// A failed submission leaves its entry queued and the pass moves on;
    /// the aggregate count comes back in the report. Only a queue *read*
    /// failure aborts the pass itself.
    ///
    /// ## Known Window
    /// If the process dies between a successful remote commit and the
    /// local `remove`, the entry is still queued on restart and the next
    /// pass submits it again, producing a duplicate order. The design
    /// accepts that over risking a lost sale record.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let entries = self.queue.list().await?;
        if entries.is_empty() {
            info!("Offline queue empty; nothing to drain");
            return Ok(DrainReport::default());
        }

        info!(pending = entries.len(), "Draining offline queue");
        let mut report = DrainReport::default();

        for entry in entries {
            // The entry's draft is the full sale; offline bookkeeping
            // (offline_id, enqueued_at, placeholder number) stays behind.
            match self.pipeline.commit(&entry.draft).await {
                Ok(committed) => {
                    info!(
                        offline_id = %entry.offline_id,
                        order_number = %committed.order_number,
                        "Queued sale submitted"
                    );

                    if let Err(e) = self.queue.remove(&entry.offline_id).await {
                        // The remote commit already happened; the entry
                        // will be submitted again on the next pass.
                        error!(
                            offline_id = %entry.offline_id,
                            error = %e,
                            "Failed to remove submitted entry from queue"
                        );
                    }

                    report.submitted += 1;
                }
                Err(e) => {
                    warn!(
                        offline_id = %entry.offline_id,
                        error = %e,
                        "Queued sale submission failed; entry stays queued"
                    );
                    report.failures.push(DrainFailure {
                        offline_id: entry.offline_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            submitted = report.submitted,
            failed = report.failed(),
            "Drain pass complete"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::OrderNumberAllocator;
    use crate::testing::{init_tracing, valid_draft, FakeBackend, FakeNotifier};
    use lumen_core::DeliveryTerm;
    use lumen_store::MemoryStore;
    use std::sync::Arc;

    struct Harness {
        backend: Arc<FakeBackend>,
        queue: OfflineQueue,
        reconciler: SyncReconciler,
    }

    fn harness(last_max: u32) -> Harness {
        let backend = Arc::new(FakeBackend::new());
        let queue = OfflineQueue::new(Arc::new(MemoryStore::new()));
        let pipeline = CommitPipeline::new(
            backend.clone(),
            Arc::new(FakeNotifier::new()),
            Arc::new(OrderNumberAllocator::new(last_max)),
        );
        let reconciler = SyncReconciler::new(queue.clone(), pipeline);
        Harness {
            backend,
            queue,
            reconciler,
        }
    }

    #[tokio::test]
    async fn test_drain_submits_in_insertion_order_with_fresh_numbers() {
        init_tracing();
        let h = harness(99);

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-1111")
            .await
            .unwrap();
        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days45), "OFF-2222")
            .await
            .unwrap();

        let report = h.reconciler.drain().await.unwrap();

        assert_eq!(report.submitted, 2);
        assert!(report.is_clean());

        let sales = h.backend.sales();
        assert_eq!(sales.len(), 2);
        // Fresh online numbers, placeholders never reused
        assert_eq!(sales[0].order_number, "00100");
        assert_eq!(sales[1].order_number, "00101");

        assert_eq!(h.queue.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_drain_on_empty_queue_is_a_clean_noop() {
        let h = harness(0);

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-1111")
            .await
            .unwrap();
        let first = h.reconciler.drain().await.unwrap();
        assert_eq!(first.submitted, 1);

        // Back-to-back second pass on the emptied queue
        let second = h.reconciler.drain().await.unwrap();
        assert_eq!(second.submitted, 0);
        assert_eq!(second.failed(), 0);
        assert_eq!(h.backend.sales().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_entry_stays_queued_and_pass_continues() {
        let h = harness(0);

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-1111")
            .await
            .unwrap();

        // An entry that can never pass commit validation
        let mut broken = valid_draft(DeliveryTerm::Days15);
        broken.customer = None;
        h.queue.enqueue(&broken, "OFF-2222").await.unwrap();

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-3333")
            .await
            .unwrap();

        let report = h.reconciler.drain().await.unwrap();

        assert_eq!(report.submitted, 2);
        assert_eq!(report.failed(), 1);

        let remaining = h.queue.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].order_number, "OFF-2222");
    }

    #[tokio::test]
    async fn test_network_failure_leaves_whole_queue_intact() {
        let h = harness(0);
        h.backend.set_fail_create_sale(true);

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-1111")
            .await
            .unwrap();
        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-2222")
            .await
            .unwrap();

        let report = h.reconciler.drain().await.unwrap();

        assert_eq!(report.submitted, 0);
        assert_eq!(report.failed(), 2);
        assert_eq!(h.queue.pending_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_drained_sales_run_full_side_effects() {
        let h = harness(0);
        h.backend.set_stock("p1", 5);

        h.queue
            .enqueue(&valid_draft(DeliveryTerm::Days15), "OFF-1111")
            .await
            .unwrap();
        h.reconciler.drain().await.unwrap();

        // Stock adjusted and delivery created by the shared commit path
        assert_eq!(h.backend.stock("p1"), 3);
        assert_eq!(h.backend.deliveries().len(), 1);
    }
}
