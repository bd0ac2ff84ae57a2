//! # Domain Types
//!
//! Core domain types shared across the checkout flow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐        │
//! │  │  CustomerRef   │  │   SaleConfig   │  │ DeferredPayment│        │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │        │
//! │  │  id            │  │  date          │  │  active        │        │
//! │  │  name          │  │  store         │  │  amount_cents  │        │
//! │  │  phone?        │  │  delivery_term │  │  method        │        │
//! │  │  address?      │  └────────────────┘  └────────────────┘        │
//! │  └────────────────┘                                                │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐                            │
//! │  │  DeliveryTerm  │  │ PaymentMethod  │                            │
//! │  │  ────────────  │  │  ────────────  │                            │
//! │  │  PickupAtStore │  │  Cash          │                            │
//! │  │  Days15        │  │  Card          │                            │
//! │  │  Days45        │  │  Transfer      │                            │
//! │  └────────────────┘  └────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Delivery Term
// =============================================================================

/// The fulfillment category selected for a sale.
///
/// Pickup has no lead time; the delivery variants carry a fixed lead time
/// used to compute the delivery due date from the commit date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTerm {
    /// Customer collects the goods at the store; no delivery record.
    PickupAtStore,
    /// Delivery within 15 days of commit.
    Days15,
    /// Delivery within 45 days of commit.
    Days45,
}

impl DeliveryTerm {
    /// Fixed lead time in days, `None` for pickup.
    #[inline]
    pub const fn lead_time_days(&self) -> Option<i64> {
        match self {
            DeliveryTerm::PickupAtStore => None,
            DeliveryTerm::Days15 => Some(15),
            DeliveryTerm::Days45 => Some(45),
        }
    }

    /// Whether the sale is fulfilled at the counter.
    #[inline]
    pub const fn is_pickup(&self) -> bool {
        matches!(self, DeliveryTerm::PickupAtStore)
    }

    /// Delivery due date for a sale committed on `commit_date`.
    ///
    /// Returns `None` for pickup sales, which have no fulfillment record.
    pub fn due_date(&self, commit_date: NaiveDate) -> Option<NaiveDate> {
        self.lead_time_days()
            .map(|days| commit_date + chrono::Duration::days(days))
    }
}

impl fmt::Display for DeliveryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryTerm::PickupAtStore => write!(f, "pickup at store"),
            DeliveryTerm::Days15 => write!(f, "15-day delivery"),
            DeliveryTerm::Days45 => write!(f, "45-day delivery"),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a payment entry was tendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment, optionally split into installments.
    Card,
    /// Bank transfer.
    Transfer,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Transfer => write!(f, "transfer"),
        }
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// A reference to a customer picked by the external selector component.
///
/// Customer creation and lookup are delegated entirely to that component;
/// the checkout flow only carries the fields it needs for commit-time
/// side-effects (notification and delivery address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    /// Identifier in the system of record.
    pub id: String,

    /// Display name, also used in the delivery notification.
    pub name: String,

    /// Phone number for the notification dispatcher, if on file.
    pub phone: Option<String>,

    /// Formatted address for the delivery record, if on file.
    pub address: Option<String>,
}

// =============================================================================
// Sale Configuration
// =============================================================================

/// Per-sale configuration captured in step 2 of the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Operator-chosen sale date.
    pub date: NaiveDate,

    /// Store the sale is recorded against.
    pub store: String,

    /// Selected fulfillment category; must be set before step 3.
    pub delivery_term: Option<DeliveryTerm>,
}

impl SaleConfig {
    /// Creates a configuration for the given date and store, with no
    /// delivery term selected yet.
    pub fn new(date: NaiveDate, store: impl Into<String>) -> Self {
        SaleConfig {
            date,
            store: store.into(),
            delivery_term: None,
        }
    }
}

// =============================================================================
// Deferred Payment
// =============================================================================

/// A payment explicitly deferred to the delivery event.
///
/// Informational only: it never subtracts from the remaining balance, but an
/// active deferred payment is what lets the operator commit a sale with a
/// positive remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeferredPayment {
    /// Whether collect-on-delivery is agreed for this sale.
    pub active: bool,

    /// Amount to collect at delivery, in cents.
    pub amount_cents: i64,

    /// Method the customer intends to pay with at delivery.
    #[serde(default)]
    pub method: PaymentMethod,
}

// =============================================================================
// Unit Tests
// =============================================================================
