//! # Checkout State Machine
//!
//! The 3-step checkout flow and its transition guards.
//!
//! ## States and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Checkout State Machine                          │
//! │                                                                     │
//! │   ProductSelection(1) ──► CustomerAndDelivery(2) ──► Payment(3)     │
//! │         ▲                        ▲      │                 │         │
//! │         └────────────────────────┴──────┘◄────────────────┘         │
//! │                                                                     │
//! │   1→2 : requires at least one line item                             │
//! │   2→3 : requires customer AND delivery term                         │
//! │   3→2, 2→1 : always permitted, draft preserved                      │
//! │   Commit : implicit terminal action from step 3                     │
//! │                                                                     │
//! │   A failed guard NEVER advances the state.                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::draft::SaleDraft;
use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Checkout Step
// =============================================================================

/// Position in the 3-step checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Step 1: building the cart.
    ProductSelection,
    /// Step 2: customer selection and sale configuration.
    CustomerAndDelivery,
    /// Step 3: payment composition; commit is reachable from here.
    Payment,
}

impl CheckoutStep {
    /// 1-based step number, as presented to the operator.
    #[inline]
    pub const fn number(&self) -> u8 {
        match self {
            CheckoutStep::ProductSelection => 1,
            CheckoutStep::CustomerAndDelivery => 2,
            CheckoutStep::Payment => 3,
        }
    }
}

impl Default for CheckoutStep {
    fn default() -> Self {
        CheckoutStep::ProductSelection
    }
}

// =============================================================================
// Transition Functions
// =============================================================================

impl SaleDraft {
    /// Advances to the next step if the guard for the current step passes.
    ///
    /// On a guard failure the step is left unchanged and the blocking
    /// condition is returned for inline display.
    pub fn advance_step(&mut self) -> ValidationResult<CheckoutStep> {
        let next = match self.step {
            CheckoutStep::ProductSelection => {
                if self.line_items.is_empty() {
                    return Err(ValidationError::EmptyLineItems);
                }
                CheckoutStep::CustomerAndDelivery
            }
            CheckoutStep::CustomerAndDelivery => {
                if self.customer.is_none() {
                    return Err(ValidationError::MissingCustomer);
                }
                if self.config.delivery_term.is_none() {
                    return Err(ValidationError::MissingDeliveryTerm);
                }
                CheckoutStep::Payment
            }
            // Already at the last step; commit is the only way forward.
            CheckoutStep::Payment => CheckoutStep::Payment,
        };

        self.step = next;
        Ok(next)
    }

    /// Steps backward. Always permitted; the draft is preserved untouched.
    pub fn back_step(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::ProductSelection => CheckoutStep::ProductSelection,
            CheckoutStep::CustomerAndDelivery => CheckoutStep::ProductSelection,
            CheckoutStep::Payment => CheckoutStep::CustomerAndDelivery,
        };
        self.step
    }

    /// Checks every commit precondition at once.
    ///
    /// A draft may reach the commit action only with a non-empty cart, a
    /// customer, and a delivery term. A positive remaining balance is NOT a
    /// structural blocker (operator confirmation handles that above).
    pub fn validate_for_commit(&self) -> ValidationResult<()> {
        if self.line_items.is_empty() {
            return Err(ValidationError::EmptyLineItems);
        }
        if self.customer.is_none() {
            return Err(ValidationError::MissingCustomer);
        }
        if self.config.delivery_term.is_none() {
            return Err(ValidationError::MissingDeliveryTerm);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomerRef, DeliveryTerm};
    use chrono::NaiveDate;

    fn draft() -> SaleDraft {
        SaleDraft::new("matriz", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    fn customer() -> CustomerRef {
        CustomerRef {
            id: "c1".into(),
            name: "Ana".into(),
            phone: Some("+55 11 91234-0000".into()),
            address: Some("Rua A, 10".into()),
        }
    }

    #[test]
    fn test_advance_blocked_on_empty_cart() {
        let mut d = draft();

        let err = d.advance_step().unwrap_err();
        assert_eq!(err, ValidationError::EmptyLineItems);
        // No silent advance
        assert_eq!(d.step, CheckoutStep::ProductSelection);
    }

    #[test]
    fn test_advance_to_customer_step_with_items() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 100);

        assert_eq!(d.advance_step().unwrap(), CheckoutStep::CustomerAndDelivery);
    }

    #[test]
    fn test_advance_blocked_without_customer_or_term() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 100);
        d.advance_step().unwrap();

        assert_eq!(d.advance_step().unwrap_err(), ValidationError::MissingCustomer);
        assert_eq!(d.step, CheckoutStep::CustomerAndDelivery);

        d.set_customer(customer());
        assert_eq!(
            d.advance_step().unwrap_err(),
            ValidationError::MissingDeliveryTerm
        );
        assert_eq!(d.step, CheckoutStep::CustomerAndDelivery);

        d.set_delivery_term(DeliveryTerm::Days15);
        assert_eq!(d.advance_step().unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn test_backward_always_permitted_and_preserves_draft() {
        let mut d = draft();
        d.add_item("p1", "Sofa", 100);
        d.set_customer(customer());
        d.set_delivery_term(DeliveryTerm::Days45);
        d.advance_step().unwrap();
        d.advance_step().unwrap();

        assert_eq!(d.back_step(), CheckoutStep::CustomerAndDelivery);
        assert_eq!(d.back_step(), CheckoutStep::ProductSelection);
        assert_eq!(d.back_step(), CheckoutStep::ProductSelection);

        // Draft contents survive backward navigation
        assert_eq!(d.line_items.len(), 1);
        assert!(d.customer.is_some());
        assert_eq!(d.config.delivery_term, Some(DeliveryTerm::Days45));
    }

    #[test]
    fn test_validate_for_commit() {
        let mut d = draft();
        assert!(d.validate_for_commit().is_err());

        d.add_item("p1", "Sofa", 100);
        assert_eq!(
            d.validate_for_commit().unwrap_err(),
            ValidationError::MissingCustomer
        );

        d.set_customer(customer());
        assert_eq!(
            d.validate_for_commit().unwrap_err(),
            ValidationError::MissingDeliveryTerm
        );

        d.set_delivery_term(DeliveryTerm::PickupAtStore);
        assert!(d.validate_for_commit().is_ok());
    }
}
