//! # Collaborator Ports
//!
//! The injected interfaces to the system of record and the notification
//! dispatcher, plus the payload records that cross them.
//!
//! ## Consumed Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    External Collaborators                           │
//! │                                                                     │
//! │  SystemOfRecord (customers/products/sales/deliveries)               │
//! │  ├── latest_order_number()      "list most recent sale"             │
//! │  ├── create_sale(SaleRecord)                                        │
//! │  ├── product_stock(ref) / update_product_stock(ref, n)              │
//! │  └── create_delivery(DeliveryRecord)                                │
//! │                                                                     │
//! │  Notifier (fire-and-forget)                                         │
//! │  └── notify({phone, name, order_number, delivery_term})             │
//! │                                                                     │
//! │  The core observes only success/failure of the notifier, for        │
//! │  logging; it never blocks on or retries it.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;
use lumen_core::{DeferredPayment, DeliveryTerm, LineItem, Payment};

// =============================================================================
// Sale Record
// =============================================================================

/// A committed sale as handed to the system of record.
///
/// Built from a SaleDraft at commit time; offline-only bookkeeping
/// (offline id, enqueue stamp) never reaches this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Record identifier (UUID v4), generated at commit.
    pub id: String,

    /// Freshly allocated online order number.
    pub order_number: String,

    /// Store the sale is recorded against.
    pub store: String,

    /// Operator-chosen sale date.
    pub date: NaiveDate,

    /// Customer identifier in the system of record.
    pub customer_ref: String,

    /// Customer display name at commit time.
    pub customer_name: String,

    /// Aggregated cart lines.
    pub line_items: Vec<LineItem>,

    /// Derived totals, frozen at commit.
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,

    /// Payments collected at the terminal.
    pub payments: Vec<Payment>,

    /// Collect-on-delivery payment, if agreed.
    pub deferred_payment: DeferredPayment,

    /// Selected fulfillment category.
    pub delivery_term: DeliveryTerm,

    /// Operator notes.
    pub notes: String,

    /// When the commit ran.
    pub committed_at: DateTime<Utc>,
}

// =============================================================================
// Delivery Record
// =============================================================================

/// Fulfillment status of a delivery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Created by the commit path; awaiting fulfillment.
    Pending,
    /// Goods handed to the customer.
    Delivered,
    /// Fulfillment cancelled.
    Cancelled,
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

/// A fulfillment record created for non-pickup sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Record identifier (UUID v4).
    pub id: String,

    /// Sale this delivery fulfills.
    pub sale_id: String,

    /// Order number, for the delivery crew's paperwork.
    pub order_number: String,

    /// Customer display name.
    pub customer_name: String,

    /// Formatted address, or a placeholder if none is on file.
    pub address: String,

    /// Always created as Pending.
    pub status: DeliveryStatus,

    /// Commit date plus the term's fixed lead time.
    pub due_date: NaiveDate,
}

// =============================================================================
// Notification Payload
// =============================================================================

/// Payload handed to the fire-and-forget notification dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Customer phone, if on file; the dispatcher decides what to do
    /// without one.
    pub phone: Option<String>,

    /// Customer display name.
    pub name: String,

    /// Order number as allocated at commit.
    pub order_number: String,

    /// Human-readable delivery term.
    pub delivery_term: String,
}

// =============================================================================
// Ports
// =============================================================================

/// The externally-owned system of record.
///
/// Stock and the order-number sequence live behind this port with no lock,
/// no transaction, and no optimistic-concurrency check; cross-terminal
/// races on them are accepted behavior.
#[async_trait]
pub trait SystemOfRecord: Send + Sync {
    /// Order number of the most recently created sale, if any.
    ///
    /// Fetched once per session to seed the allocator, never re-fetched
    /// atomically at commit time.
    async fn latest_order_number(&self) -> SyncResult<Option<String>>;

    /// Creates a sale record.
    async fn create_sale(&self, sale: &SaleRecord) -> SyncResult<()>;

    /// Reads a product's current stock level.
    async fn product_stock(&self, product_ref: &str) -> SyncResult<i64>;

    /// Writes a product's stock level (read-then-write, not a decrement).
    async fn update_product_stock(&self, product_ref: &str, new_stock: i64) -> SyncResult<()>;

    /// Creates a delivery record.
    async fn create_delivery(&self, delivery: &DeliveryRecord) -> SyncResult<()>;
}

/// The external notification dispatcher.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatches one notification. Failures are logged and swallowed by
    /// the commit path; never retried there.
    async fn notify(&self, payload: NotificationPayload) -> SyncResult<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================
