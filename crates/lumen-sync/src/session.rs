//! # Checkout Session
//!
//! The embeddable surface of the checkout core: one draft threaded through
//! the state machine, snapshotted on every mutation, finalized online or
//! into the offline queue.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       CheckoutSession                               │
//! │                                                                     │
//! │  start() ── restore snapshot or begin empty                         │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  UI events ──► add_item / set_customer / add_payment / ...          │
//! │     │              └── every mutation re-saves the full snapshot    │
//! │     ▼                                                               │
//! │  finalize()                                                         │
//! │     ├── online  ──► CommitPipeline::commit ──► reset                │
//! │     │               └── failure: draft PRESERVED, not re-queued     │
//! │     └── offline ──► OfflineQueue::enqueue  ──► reset                │
//! │                     └── failure: draft PRESERVED, sale NOT saved    │
//! │                                                                     │
//! │  The draft is an explicit value owned here — never module-level     │
//! │  state — and persistence goes through the injected storage port.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::allocator::OrderNumberAllocator;
use crate::commit::{CommitPipeline, CommittedSale};
use crate::connectivity::ConnectivityMonitor;
use crate::error::SyncResult;
use lumen_core::types::{CustomerRef, DeferredPayment, DeliveryTerm, PaymentMethod};
use lumen_core::validation;
use lumen_core::{CheckoutStep, SaleDraft};
use lumen_store::{DraftStore, OfflineQueue, OfflineQueueEntry};

// =============================================================================
// Finalize Outcome
// =============================================================================

/// How a finalize call durably recorded the sale.
#[derive(Debug, Clone)]
pub enum FinalizeOutcome {
    /// Committed directly against the system of record.
    Committed(CommittedSale),

    /// Enqueued locally, awaiting an operator-triggered drain.
    Queued(OfflineQueueEntry),
}

impl FinalizeOutcome {
    /// The order number shown on the confirmation screen: final for an
    /// online commit, an "OFF-" placeholder for a queued sale.
    pub fn order_number(&self) -> &str {
        match self {
            FinalizeOutcome::Committed(c) => &c.order_number,
            FinalizeOutcome::Queued(e) => &e.order_number,
        }
    }
}

// =============================================================================
// Checkout Session
// =============================================================================

/// One terminal's checkout flow: draft, persistence, connectivity branch.
pub struct CheckoutSession {
    store_name: String,
    draft: SaleDraft,
    draft_store: DraftStore,
    queue: OfflineQueue,
    connectivity: Arc<ConnectivityMonitor>,
    pipeline: CommitPipeline,
    allocator: Arc<OrderNumberAllocator>,
}

impl CheckoutSession {
    /// Starts a session, restoring an interrupted draft if a snapshot
    /// survives from the previous run.
    pub async fn start(
        store_name: impl Into<String>,
        draft_store: DraftStore,
        queue: OfflineQueue,
        connectivity: Arc<ConnectivityMonitor>,
        pipeline: CommitPipeline,
        allocator: Arc<OrderNumberAllocator>,
    ) -> SyncResult<Self> {
        let store_name = store_name.into();
        validation::validate_store(&store_name)?;

        let draft = match draft_store.load().await? {
            Some(restored) => {
                info!(
                    step = restored.step.number(),
                    items = restored.line_items.len(),
                    "Restored interrupted draft"
                );
                restored
            }
            None => SaleDraft::new(&store_name, Utc::now().date_naive()),
        };

        Ok(CheckoutSession {
            store_name,
            draft,
            draft_store,
            queue,
            connectivity,
            pipeline,
            allocator,
        })
    }

    /// Read access to the draft, for rendering.
    pub fn draft(&self) -> &SaleDraft {
        &self.draft
    }

    /// Current checkout step.
    pub fn step(&self) -> CheckoutStep {
        self.draft.step
    }

    /// Current connectivity flag.
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    // =========================================================================
    // Draft Mutations (each one re-snapshots the full draft)
    // =========================================================================

    /// Adds one unit of a product to the cart.
    pub async fn add_item(
        &mut self,
        product_ref: &str,
        name: &str,
        unit_price_cents: i64,
    ) -> SyncResult<()> {
        validation::validate_product_ref(product_ref)?;
        validation::validate_unit_price(unit_price_cents)?;
        self.draft.add_item(product_ref, name, unit_price_cents);
        self.persist().await
    }

    /// Removes a line item by position.
    pub async fn remove_item(&mut self, index: usize) -> SyncResult<()> {
        self.draft.remove_item(index)?;
        self.persist().await
    }

    /// Attaches the customer picked by the external selector.
    pub async fn set_customer(&mut self, customer: CustomerRef) -> SyncResult<()> {
        self.draft.set_customer(customer);
        self.persist().await
    }

    /// Sets the operator-chosen sale date.
    pub async fn set_sale_date(&mut self, date: NaiveDate) -> SyncResult<()> {
        self.draft.config.date = date;
        self.persist().await
    }

    /// Selects the fulfillment category.
    pub async fn set_delivery_term(&mut self, term: DeliveryTerm) -> SyncResult<()> {
        self.draft.set_delivery_term(term);
        self.persist().await
    }

    /// Sets the whole-sale discount.
    pub async fn set_discount(&mut self, discount_cents: i64) -> SyncResult<()> {
        validation::validate_discount(discount_cents)?;
        self.draft.set_discount(discount_cents);
        self.persist().await
    }

    /// Replaces the operator notes.
    pub async fn set_notes(&mut self, notes: &str) -> SyncResult<()> {
        self.draft.set_notes(notes);
        self.persist().await
    }

    /// Appends a payment entry.
    pub async fn add_payment(
        &mut self,
        method: PaymentMethod,
        amount_cents: i64,
        installment_count: u32,
    ) -> SyncResult<()> {
        validation::validate_payment_amount(amount_cents)?;
        self.draft
            .add_payment(method, amount_cents, installment_count)?;
        self.persist().await
    }

    /// Removes a payment entry by position.
    pub async fn remove_payment(&mut self, index: usize) -> SyncResult<()> {
        self.draft.remove_payment(index)?;
        self.persist().await
    }

    /// Configures the collect-on-delivery payment.
    pub async fn set_deferred_payment(&mut self, deferred: DeferredPayment) -> SyncResult<()> {
        self.draft.set_deferred_payment(deferred);
        self.persist().await
    }

    // =========================================================================
    // Step Navigation
    // =========================================================================

    /// Advances the checkout step, enforcing the transition guards.
    pub async fn advance_step(&mut self) -> SyncResult<CheckoutStep> {
        let step = self.draft.advance_step()?;
        self.persist().await?;
        Ok(step)
    }

    /// Steps backward; always permitted, draft untouched.
    pub async fn back_step(&mut self) -> SyncResult<CheckoutStep> {
        let step = self.draft.back_step();
        self.persist().await?;
        Ok(step)
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    /// Durably records the sale: online commit when connected, offline
    /// enqueue otherwise. On success the session resets to a fresh draft.
    ///
    /// ## Failure Behavior
    /// - Online commit failure: the error surfaces as a blocking alert
    ///   and the draft is preserved; the sale is NOT silently re-queued
    ///   offline.
    /// - Offline enqueue failure: the error surfaces as a blocking alert
    ///   and the sale is NOT treated as committed.
    pub async fn finalize(&mut self) -> SyncResult<FinalizeOutcome> {
        self.draft.validate_for_commit()?;

        let outcome = if self.connectivity.is_online() {
            let committed = self.pipeline.commit(&self.draft).await?;
            FinalizeOutcome::Committed(committed)
        } else {
            let placeholder = self.allocator.offline_placeholder();
            let entry = self.queue.enqueue(&self.draft, &placeholder).await?;
            FinalizeOutcome::Queued(entry)
        };

        info!(order_number = %outcome.order_number(), "Sale recorded; resetting draft");
        self.reset().await;
        Ok(outcome)
    }

    // =========================================================================
    // Connectivity & Queue Surface
    // =========================================================================

    /// Applies a platform connectivity event.
    ///
    /// A transition to online returns the pending-queue size for the
    /// status banner; it never triggers a drain by itself.
    pub async fn handle_connectivity_change(&self, online: bool) -> SyncResult<Option<usize>> {
        let was_online = self.connectivity.is_online();
        self.connectivity.set_online(online);

        if online && !was_online {
            let pending = self.queue.pending_count().await?;
            return Ok(Some(pending));
        }
        Ok(None)
    }

    /// Number of sales awaiting submission.
    pub async fn pending_offline_count(&self) -> SyncResult<usize> {
        Ok(self.queue.pending_count().await?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn persist(&self) -> SyncResult<()> {
        Ok(self.draft_store.save(&self.draft).await?)
    }

    async fn reset(&mut self) {
        self.draft = SaleDraft::new(&self.store_name, Utc::now().date_naive());
        // The sale is already durably recorded; a failed snapshot clear
        // must not mask that.
        if let Err(e) = self.draft_store.clear().await {
            warn!(error = %e, "Failed to clear draft snapshot after commit");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
