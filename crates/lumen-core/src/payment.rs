//! # Payment Composer
//!
//! Accumulates heterogeneous payment entries on the draft and derives the
//! paid / remaining amounts.
//!
//! ## Composer Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Payment Composer                              │
//! │                                                                     │
//! │  paid      = Σ payments[].amount                                    │
//! │  remaining = max(0, total - paid)                                   │
//! │                                                                     │
//! │  deferred_payment (collect on delivery) is informational only:      │
//! │  it does NOT subtract from remaining. A sale may be committed with  │
//! │  remaining > 0 when the deferred payment is active — the only gate  │
//! │  above that is operator confirmation, never this layer.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::draft::SaleDraft;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DeferredPayment, PaymentMethod};

// =============================================================================
// Payment
// =============================================================================

/// A payment entry collected at the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// How the payment was tendered.
    pub method: PaymentMethod,

    /// Amount in cents.
    pub amount_cents: i64,

    /// Number of installments; 1 for a single charge.
    pub installment_count: u32,
}

impl Payment {
    /// Creates a single-charge payment entry.
    pub fn new(method: PaymentMethod, amount_cents: i64) -> Self {
        Payment {
            method,
            amount_cents,
            installment_count: 1,
        }
    }

    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Composer Operations on the Draft
// =============================================================================

impl SaleDraft {
    /// Appends a payment entry.
    pub fn add_payment(
        &mut self,
        method: PaymentMethod,
        amount_cents: i64,
        installment_count: u32,
    ) -> CoreResult<()> {
        if amount_cents <= 0 {
            return Err(CoreError::InvalidAmount {
                reason: "payment amount must be positive".into(),
            });
        }
        self.payments.push(Payment {
            method,
            amount_cents,
            installment_count: installment_count.max(1),
        });
        Ok(())
    }

    /// Removes a payment entry by position.
    pub fn remove_payment(&mut self, index: usize) -> CoreResult<Payment> {
        if index >= self.payments.len() {
            return Err(CoreError::IndexOutOfBounds {
                kind: "payment",
                index,
            });
        }
        Ok(self.payments.remove(index))
    }

    /// Configures (or clears) the collect-on-delivery payment.
    pub fn set_deferred_payment(&mut self, deferred: DeferredPayment) {
        self.deferred_payment = deferred;
    }

    /// Sum of all collected payment amounts.
    pub fn paid(&self) -> Money {
        self.payments.iter().map(Payment::amount).sum()
    }

    /// Outstanding balance: `max(0, total - paid)`. Never negative.
    pub fn remaining(&self) -> Money {
        self.total().saturating_sub(self.paid())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft_with_total(total_cents: i64) -> SaleDraft {
        let mut d = SaleDraft::new("matriz", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        d.add_item("p1", "Sofa", total_cents);
        d
    }

    #[test]
    fn test_paid_and_remaining() {
        let mut d = draft_with_total(200);
        d.add_payment(PaymentMethod::Cash, 150, 1).unwrap();

        // Scenario: total 200, one payment of 150
        assert_eq!(d.paid().cents(), 150);
        assert_eq!(d.remaining().cents(), 50);
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut d = draft_with_total(200);
        d.add_payment(PaymentMethod::Card, 500, 3).unwrap();

        assert_eq!(d.paid().cents(), 500);
        assert_eq!(d.remaining(), Money::zero());
    }

    #[test]
    fn test_remove_payment_by_position() {
        let mut d = draft_with_total(200);
        d.add_payment(PaymentMethod::Cash, 100, 1).unwrap();
        d.add_payment(PaymentMethod::Card, 50, 2).unwrap();

        let removed = d.remove_payment(0).unwrap();
        assert_eq!(removed.amount_cents, 100);
        assert_eq!(d.payments.len(), 1);
        assert_eq!(d.paid().cents(), 50);
    }

    #[test]
    fn test_remove_payment_out_of_bounds() {
        let mut d = draft_with_total(200);
        assert!(matches!(
            d.remove_payment(2),
            Err(CoreError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let mut d = draft_with_total(200);
        assert!(d.add_payment(PaymentMethod::Cash, 0, 1).is_err());
        assert!(d.add_payment(PaymentMethod::Cash, -50, 1).is_err());
    }

    #[test]
    fn test_deferred_payment_does_not_reduce_remaining() {
        let mut d = draft_with_total(200);
        d.set_deferred_payment(DeferredPayment {
            active: true,
            amount_cents: 200,
            method: PaymentMethod::Cash,
        });

        // Informational only: remaining is untouched
        assert_eq!(d.remaining().cents(), 200);
        assert!(d.deferred_payment.active);
    }

    #[test]
    fn test_installment_count_floor_is_one() {
        let mut d = draft_with_total(200);
        d.add_payment(PaymentMethod::Card, 200, 0).unwrap();
        assert_eq!(d.payments[0].installment_count, 1);
    }
}
