//! # Shared Commit Path
//!
//! The single online-commit pipeline used by both a live finalize and the
//! sync reconciler's drain.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Commit Pipeline                               │
//! │                                                                     │
//! │  1. Validate commit preconditions (cart, customer, term)            │
//! │  2. Allocate the next online order number (session snapshot)        │
//! │  3. create_sale() against the system of record                      │
//! │  4. Per line item: read stock, write stock - quantity               │
//! │     (read-then-write; cross-terminal races are accepted)            │
//! │  5. Non-pickup term: create one Pending delivery record with        │
//! │     due date = commit date + fixed lead time (15 or 45 days)        │
//! │  6. Spawn the fire-and-forget notification task                     │
//! │                                                                     │
//! │  Any failure in 3-5 surfaces as a blocking alert; the caller keeps  │
//! │  the draft. Step 6 can never fail the commit.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::allocator::OrderNumberAllocator;
use crate::backend::{
    DeliveryRecord, DeliveryStatus, NotificationPayload, Notifier, SaleRecord, SystemOfRecord,
};
use crate::error::SyncResult;
use lumen_core::{SaleDraft, ValidationError};

/// Address written on a delivery record when the customer has none on file.
pub const ADDRESS_PLACEHOLDER: &str = "Address not on file";

// =============================================================================
// Committed Sale
// =============================================================================

/// The outcome of a successful online commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSale {
    /// Sale record id in the system of record.
    pub sale_id: String,

    /// The online order number allocated for this sale.
    pub order_number: String,
}

// =============================================================================
// Commit Pipeline
// =============================================================================

/// The shared online commit path.
#[derive(Clone)]
pub struct CommitPipeline {
    backend: Arc<dyn SystemOfRecord>,
    notifier: Arc<dyn Notifier>,
    allocator: Arc<OrderNumberAllocator>,
}

impl CommitPipeline {
    /// Creates a pipeline over the injected collaborators.
    pub fn new(
        backend: Arc<dyn SystemOfRecord>,
        notifier: Arc<dyn Notifier>,
        allocator: Arc<OrderNumberAllocator>,
    ) -> Self {
        CommitPipeline {
            backend,
            notifier,
            allocator,
        }
    }

    /// Commits a sale online.
    ///
    /// Used identically by a live finalize and by each drained queue
    /// entry; queued sales always get a fresh online order number here,
    /// never their offline placeholder.
    pub async fn commit(&self, draft: &SaleDraft) -> SyncResult<CommittedSale> {
        draft.validate_for_commit()?;

        let customer = draft
            .customer
            .as_ref()
            .ok_or(ValidationError::MissingCustomer)?;
        let term = draft
            .config
            .delivery_term
            .ok_or(ValidationError::MissingDeliveryTerm)?;

        let committed_at = Utc::now();
        let order_number = self.allocator.next_online();
        let sale_id = Uuid::new_v4().to_string();

        let sale = SaleRecord {
            id: sale_id.clone(),
            order_number: order_number.clone(),
            store: draft.config.store.clone(),
            date: draft.config.date,
            customer_ref: customer.id.clone(),
            customer_name: customer.name.clone(),
            line_items: draft.line_items.clone(),
            subtotal_cents: draft.subtotal().cents(),
            discount_cents: draft.discount_cents,
            total_cents: draft.total().cents(),
            payments: draft.payments.clone(),
            deferred_payment: draft.deferred_payment,
            delivery_term: term,
            notes: draft.notes.clone(),
            committed_at,
        };

        self.backend.create_sale(&sale).await?;
        debug!(sale_id = %sale_id, order_number = %order_number, "Sale record created");

        // Read-then-write stock adjustment, one product at a time.
        for item in &draft.line_items {
            let stock = self.backend.product_stock(&item.product_ref).await?;
            self.backend
                .update_product_stock(&item.product_ref, stock - item.quantity)
                .await?;
            debug!(
                product_ref = %item.product_ref,
                from = stock,
                to = stock - item.quantity,
                "Stock adjusted"
            );
        }

        // Non-pickup sales get exactly one Pending delivery record.
        if let Some(due_date) = term.due_date(committed_at.date_naive()) {
            let delivery = DeliveryRecord {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                order_number: order_number.clone(),
                customer_name: customer.name.clone(),
                address: customer
                    .address
                    .clone()
                    .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string()),
                status: DeliveryStatus::Pending,
                due_date,
            };
            self.backend.create_delivery(&delivery).await?;
            debug!(sale_id = %sale_id, due_date = %due_date, "Delivery record created");
        }

        self.spawn_notification(NotificationPayload {
            phone: customer.phone.clone(),
            name: customer.name.clone(),
            order_number: order_number.clone(),
            delivery_term: term.to_string(),
        });

        info!(
            sale_id = %sale_id,
            order_number = %order_number,
            total_cents = sale.total_cents,
            "Sale committed online"
        );

        Ok(CommittedSale {
            sale_id,
            order_number,
        })
    }

    /// Dispatches the notification as a detached background task.
    ///
    /// No retry, no cancellation; a failure is logged and swallowed.
    fn spawn_notification(&self, payload: NotificationPayload) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let order_number = payload.order_number.clone();
            if let Err(e) = notifier.notify(payload).await {
                warn!(order_number = %order_number, error = %e, "Notification failed; continuing");
            }
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{settle_background_tasks, valid_draft, FakeBackend, FakeNotifier};
    use lumen_core::DeliveryTerm;

    fn pipeline(
        backend: Arc<FakeBackend>,
        notifier: Arc<FakeNotifier>,
        last_max: u32,
    ) -> CommitPipeline {
        CommitPipeline::new(
            backend,
            notifier,
            Arc::new(OrderNumberAllocator::new(last_max)),
        )
    }

    #[tokio::test]
    async fn test_commit_creates_sale_with_next_number() {
        let backend = Arc::new(FakeBackend::new());
        let notifier = Arc::new(FakeNotifier::new());
        let pipeline = pipeline(backend.clone(), notifier, 41);

        let committed = pipeline.commit(&valid_draft(DeliveryTerm::Days15)).await.unwrap();

        assert_eq!(committed.order_number, "00042");
        let sales = backend.sales();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].order_number, "00042");
        assert_eq!(sales[0].total_cents, 20_000);
    }

    #[tokio::test]
    async fn test_commit_adjusts_stock_read_then_write() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_stock("p1", 10);
        let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

        pipeline.commit(&valid_draft(DeliveryTerm::Days15)).await.unwrap();

        // valid_draft sells 2 units of p1
        assert_eq!(backend.stock("p1"), 8);
        assert_eq!(backend.stock_updates(), vec![("p1".to_string(), 8)]);
    }

    #[tokio::test]
    async fn test_pickup_creates_no_delivery_record() {
        let backend = Arc::new(FakeBackend::new());
        let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

        pipeline
            .commit(&valid_draft(DeliveryTerm::PickupAtStore))
            .await
            .unwrap();

        assert!(backend.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_terms_produce_one_pending_record_with_due_date() {
        for (term, lead) in [(DeliveryTerm::Days15, 15), (DeliveryTerm::Days45, 45)] {
            let backend = Arc::new(FakeBackend::new());
            let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

            pipeline.commit(&valid_draft(term)).await.unwrap();

            let deliveries = backend.deliveries();
            assert_eq!(deliveries.len(), 1);
            assert_eq!(deliveries[0].status, DeliveryStatus::Pending);
            let expected = Utc::now().date_naive() + chrono::Duration::days(lead);
            assert_eq!(deliveries[0].due_date, expected);
        }
    }

    #[tokio::test]
    async fn test_missing_address_uses_placeholder() {
        let backend = Arc::new(FakeBackend::new());
        let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

        let mut draft = valid_draft(DeliveryTerm::Days45);
        if let Some(customer) = draft.customer.as_mut() {
            customer.address = None;
        }
        pipeline.commit(&draft).await.unwrap();

        assert_eq!(backend.deliveries()[0].address, ADDRESS_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_notification_is_fired_with_sale_details() {
        let backend = Arc::new(FakeBackend::new());
        let notifier = Arc::new(FakeNotifier::new());
        let pipeline = pipeline(backend, notifier.clone(), 0);

        pipeline.commit(&valid_draft(DeliveryTerm::Days15)).await.unwrap();
        settle_background_tasks().await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].order_number, "00001");
        assert_eq!(sent[0].delivery_term, "15-day delivery");
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_commit() {
        let backend = Arc::new(FakeBackend::new());
        let notifier = Arc::new(FakeNotifier::new());
        notifier.set_fail(true);
        let pipeline = pipeline(backend, notifier.clone(), 0);

        let committed = pipeline.commit(&valid_draft(DeliveryTerm::Days15)).await;
        settle_background_tasks().await;

        assert!(committed.is_ok());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_propagates_without_side_effects() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_fail_create_sale(true);
        let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

        let err = pipeline
            .commit(&valid_draft(DeliveryTerm::Days15))
            .await
            .unwrap_err();

        assert!(err.is_blocking());
        assert!(backend.stock_updates().is_empty());
        assert!(backend.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_any_call() {
        let backend = Arc::new(FakeBackend::new());
        let pipeline = pipeline(backend.clone(), Arc::new(FakeNotifier::new()), 0);

        let mut draft = valid_draft(DeliveryTerm::Days15);
        draft.customer = None;

        assert!(pipeline.commit(&draft).await.is_err());
        assert!(backend.sales().is_empty());
    }
}
