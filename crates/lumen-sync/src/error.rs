//! # Sync Error Types
//!
//! Error types for the commit path, the connectivity-dependent flow, and
//! the queue drain.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Sync Error Categories                          │
//! │                                                                     │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌────────────────────┐  │
//! │  │   Validation    │  │    Storage      │  │     Network        │  │
//! │  │                 │  │                 │  │                    │  │
//! │  │  Missing items/ │  │  Enqueue write  │  │  Online commit     │  │
//! │  │  customer/term  │  │  failed: sale   │  │  failed: blocking  │  │
//! │  │  inline message │  │  NOT saved      │  │  alert, draft kept │  │
//! │  └─────────────────┘  └─────────────────┘  └────────────────────┘  │
//! │                                                                     │
//! │  Partial drain failures are NOT errors: drain() finishes the pass   │
//! │  and reports them aggregated in its DrainReport.                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use lumen_core::{CoreError, ValidationError};
use lumen_store::StoreError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced at the user-triggered actions (finalize, enqueue, drain).
///
/// ## Design Principles
/// - Each variant carries enough context for the operator alert
/// - Categories map one-to-one to the UI treatment (inline vs blocking)
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Validation (inline, blocks the action without losing anything)
    // =========================================================================
    /// The draft failed a transition guard or a commit precondition.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A domain rule was violated while mutating the draft.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Storage (blocking alert; the sale is NOT treated as committed)
    // =========================================================================
    /// The local snapshot or queue write failed.
    #[error("Local storage error: {0}")]
    Storage(#[from] StoreError),

    // =========================================================================
    // Network (blocking alert; draft preserved, NOT auto re-queued)
    // =========================================================================
    /// A system-of-record call failed while the terminal still reports
    /// itself online.
    #[error("Network error: {0}")]
    Network(String),

    /// The notification dispatcher rejected a payload.
    ///
    /// Only ever logged: the commit path swallows this by design.
    #[error("Notification dispatch failed: {0}")]
    Notification(String),
}

impl SyncError {
    /// True when the operator should see a blocking modal alert rather
    /// than an inline message.
    pub fn is_blocking(&self) -> bool {
        matches!(self, SyncError::Storage(_) | SyncError::Network(_))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_categorization() {
        assert!(SyncError::Network("timeout".into()).is_blocking());
        assert!(SyncError::Storage(StoreError::QuotaExceeded("full".into())).is_blocking());

        assert!(!SyncError::Validation(ValidationError::EmptyLineItems).is_blocking());
        assert!(!SyncError::Notification("rejected".into()).is_blocking());
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err: SyncError = ValidationError::MissingCustomer.into();
        assert_eq!(err.to_string(), "A customer must be selected");
    }
}
