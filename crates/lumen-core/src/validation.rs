//! # Validation Module
//!
//! Field-level validators used before draft mutations reach business logic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Host UI                                                   │
//! │  ├── Basic format checks, immediate feedback                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE — field rules on mutation                     │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Transition guards (checkout.rs) at step boundaries        │
//! │           and validate_for_commit at finalize                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (giveaway items)
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit price",
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative payments are meaningless
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount",
        });
    }
    Ok(())
}

/// Validates a whole-sale discount in cents.
///
/// ## Rules
/// - Must be non-negative; the total is clamped at zero anyway, so an
///   oversized discount is allowed and simply zeroes the total
pub fn validate_discount(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "discount",
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product reference.
pub fn validate_product_ref(product_ref: &str) -> ValidationResult<()> {
    if product_ref.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product reference",
        });
    }
    Ok(())
}

/// Validates a store identifier.
pub fn validate_store(store: &str) -> ValidationResult<()> {
    if store.trim().is_empty() {
        return Err(ValidationError::Required { field: "store" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(0).is_ok());
        assert!(validate_unit_price(1099).is_ok());
        assert!(validate_unit_price(-1).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-100).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(0).is_ok());
        assert!(validate_discount(5_000).is_ok());
        assert!(validate_discount(-1).is_err());
    }

    #[test]
    fn test_validate_product_ref() {
        assert!(validate_product_ref("p1").is_ok());
        assert!(validate_product_ref("").is_err());
        assert!(validate_product_ref("   ").is_err());
    }

    #[test]
    fn test_validate_store() {
        assert!(validate_store("matriz").is_ok());
        assert!(validate_store(" ").is_err());
    }
}
