//! # Error Types
//!
//! Domain-specific error types for lumen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  lumen-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                       │
//! │  └── ValidationError  - Draft/state-machine guard failures          │
//! │                                                                     │
//! │  lumen-store errors (separate crate)                                │
//! │  └── StoreError       - Local persistence failures                  │
//! │                                                                     │
//! │  lumen-sync errors (separate crate)                                 │
//! │  └── SyncError        - Commit / drain failures                     │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → SyncError → Operator alert     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ref, index, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to an inline operator-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent domain rule violations. They are caught at the
/// user-triggered action (finalize, enqueue, drain) and surfaced inline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line-item or payment index is out of bounds.
    #[error("No {kind} at position {index}")]
    IndexOutOfBounds { kind: &'static str, index: usize },

    /// A monetary amount is invalid for the operation.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Draft validation errors.
///
/// These block a state-machine transition or the commit action and are
/// surfaced inline next to the step that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The draft has no line items (blocks step 1 → 2 and commit).
    #[error("At least one line item is required")]
    EmptyLineItems,

    /// No customer is attached to the draft (blocks step 2 → 3 and commit).
    #[error("A customer must be selected")]
    MissingCustomer,

    /// No delivery term is selected (blocks step 2 → 3 and commit).
    #[error("A delivery term must be selected")]
    MissingDeliveryTerm,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::IndexOutOfBounds {
            kind: "payment",
            index: 3,
        };
        assert_eq!(err.to_string(), "No payment at position 3");

        let err = ValidationError::EmptyLineItems;
        assert_eq!(err.to_string(), "At least one line item is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MissingCustomer;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
