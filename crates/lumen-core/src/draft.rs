//! # Sale Draft & Line-Item Aggregator
//!
//! The in-progress, not-yet-committed sale under construction at the
//! terminal, and the cart operations that mutate it.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       SaleDraft Lifecycle                           │
//! │                                                                     │
//! │  Terminal start ──► SaleDraft::new() (or restored from snapshot)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  UI-driven mutations: add_item / remove_item / set_customer /       │
//! │  set_delivery_term / add_payment / set_discount / ...               │
//! │       │   (every mutation is re-snapshotted by the session layer)   │
//! │       ▼                                                             │
//! │  Commit (online) or offline enqueue                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Reset to a fresh empty draft                                       │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Aggregation Invariant
//! Line items are unique by `product_ref`: adding a product that is already
//! present increments its quantity and recomputes the line subtotal, never
//! appending a duplicate row. The aggregator exposes no decrement or
//! quantity-edit operation; quantity is purely addition-driven.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checkout::CheckoutStep;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::Payment;
use crate::types::{CustomerRef, DeferredPayment, DeliveryTerm, SaleConfig};

// =============================================================================
// Line Item
// =============================================================================

/// A quantity-aggregated line in the cart.
///
/// Product details are frozen at the moment of the first addition, so the
/// cart stays consistent even if the catalog changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier in the system of record.
    pub product_ref: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Quantity accumulated through repeated additions.
    pub quantity: i64,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Line subtotal in cents; always `quantity * unit_price_cents`.
    pub subtotal_cents: i64,
}

impl LineItem {
    fn new(product_ref: impl Into<String>, name: impl Into<String>, unit_price_cents: i64) -> Self {
        LineItem {
            product_ref: product_ref.into(),
            name: name.into(),
            quantity: 1,
            unit_price_cents,
            subtotal_cents: unit_price_cents,
        }
    }

    /// Increments the quantity by one and recomputes the subtotal.
    fn increment(&mut self) {
        self.quantity += 1;
        self.subtotal_cents = self.quantity * self.unit_price_cents;
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The complete in-progress sale: checkout position, cart, customer,
/// configuration, payments, and notes.
///
/// The draft is an explicit context value threaded through the checkout
/// session — never global state. It is serialized in full into the
/// restart-durable snapshot after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDraft {
    /// Current position in the 3-step checkout flow.
    pub step: CheckoutStep,

    /// Customer picked by the external selector, once step 2 is reached.
    pub customer: Option<CustomerRef>,

    /// Quantity-aggregated cart lines.
    pub line_items: Vec<LineItem>,

    /// Sale date, store, and delivery term.
    pub config: SaleConfig,

    /// Whole-sale discount in cents, subtracted from the subtotal.
    pub discount_cents: i64,

    /// Payments collected at the terminal.
    pub payments: Vec<Payment>,

    /// Optional collect-on-delivery payment (informational).
    pub deferred_payment: DeferredPayment,

    /// Free-form operator notes.
    pub notes: String,
}

impl SaleDraft {
    /// Creates a fresh empty draft at step 1 for the given store and date.
    pub fn new(store: impl Into<String>, date: NaiveDate) -> Self {
        SaleDraft {
            step: CheckoutStep::ProductSelection,
            customer: None,
            line_items: Vec::new(),
            config: SaleConfig::new(date, store),
            discount_cents: 0,
            payments: Vec::new(),
            deferred_payment: DeferredPayment::default(),
            notes: String::new(),
        }
    }

    // =========================================================================
    // Cart / Line-Item Aggregator
    // =========================================================================

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Product already present (same `product_ref`): its quantity is
    ///   incremented and the line subtotal recomputed.
    /// - Otherwise: a new line with `quantity = 1` is appended.
    pub fn add_item(
        &mut self,
        product_ref: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
    ) {
        let product_ref = product_ref.into();

        if let Some(item) = self
            .line_items
            .iter_mut()
            .find(|i| i.product_ref == product_ref)
        {
            item.increment();
            return;
        }

        self.line_items
            .push(LineItem::new(product_ref, name, unit_price_cents));
    }

    /// Removes a line item by position.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.line_items.len() {
            return Err(CoreError::IndexOutOfBounds {
                kind: "line item",
                index,
            });
        }
        Ok(self.line_items.remove(index))
    }

    // =========================================================================
    // Field Mutations
    // =========================================================================

    /// Attaches the customer picked by the external selector.
    pub fn set_customer(&mut self, customer: CustomerRef) {
        self.customer = Some(customer);
    }

    /// Clears the attached customer.
    pub fn clear_customer(&mut self) {
        self.customer = None;
    }

    /// Selects the fulfillment category for the sale.
    pub fn set_delivery_term(&mut self, term: DeliveryTerm) {
        self.config.delivery_term = Some(term);
    }

    /// Sets the whole-sale discount in cents.
    pub fn set_discount(&mut self, discount_cents: i64) {
        self.discount_cents = discount_cents;
    }

    /// Replaces the operator notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    /// Sum of all line subtotals.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.line_items.iter().map(|i| i.subtotal_cents).sum())
    }

    /// Subtotal minus discount, clamped at zero.
    pub fn total(&self) -> Money {
        self.subtotal().saturating_sub(Money::from_cents(self.discount_cents))
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SaleDraft {
        SaleDraft::new("matriz", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn test_add_item_appends_new_line() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 10_000);

        assert_eq!(d.line_items.len(), 1);
        assert_eq!(d.line_items[0].quantity, 1);
        assert_eq!(d.line_items[0].subtotal_cents, 10_000);
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 10_000);
        d.add_item("p1", "Sofa", 10_000);

        // One aggregated line, never two entries
        assert_eq!(d.line_items.len(), 1);
        assert_eq!(d.line_items[0].quantity, 2);
        assert_eq!(d.line_items[0].subtotal_cents, 20_000);
    }

    #[test]
    fn test_subtotal_invariant_holds_per_line() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 10_000);
        d.add_item("p2", "Chair", 2_500);
        d.add_item("p1", "Sofa", 10_000);

        for item in &d.line_items {
            assert_eq!(item.subtotal_cents, item.quantity * item.unit_price_cents);
        }
        assert_eq!(d.subtotal().cents(), 22_500);
    }

    #[test]
    fn test_remove_item_by_position() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 10_000);
        d.add_item("p2", "Chair", 2_500);

        let removed = d.remove_item(0).unwrap();
        assert_eq!(removed.product_ref, "p1");
        assert_eq!(d.line_items.len(), 1);
        assert_eq!(d.line_items[0].product_ref, "p2");
    }

    #[test]
    fn test_remove_item_out_of_bounds() {
        let mut d = draft();
        assert!(matches!(
            d.remove_item(0),
            Err(CoreError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_total_applies_discount_clamped_at_zero() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 100);
        d.add_item("p1", "Sofa", 100);

        // Scenario: unit price 100 x 2, no discount
        assert_eq!(d.subtotal().cents(), 200);
        assert_eq!(d.total().cents(), 200);

        d.set_discount(50);
        assert_eq!(d.total().cents(), 150);

        d.set_discount(10_000);
        assert_eq!(d.total(), Money::zero());
    }
}
