//! # Storage Error Types
//!
//! Error types for local persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite error (sqlx::Error) / serde_json::Error                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← adds context and categorization         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SyncError::Storage (lumen-sync) ← blocking operator alert;         │
//! │  an enqueue that fails here is NOT treated as a committed sale      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Local persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record failed to serialize or deserialize.
    ///
    /// ## When This Occurs
    /// - Corrupt snapshot left by an older build
    /// - A hand-edited record file
    #[error("Record serialization failed: {0}")]
    Serialization(String),

    /// The backing store is out of space.
    ///
    /// Surfaced as a blocking alert: the sale is NOT saved.
    #[error("Local storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Storage connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permission issue
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A read or write against the store failed.
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    /// No queue entry carries the given offline id.
    ///
    /// ## When This Occurs
    /// - A drain pass raced a manual queue inspection tool
    /// - The entry was already removed by an earlier, interrupted pass
    #[error("No queued sale with offline id {offline_id}")]
    EntryNotFound { offline_id: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// "database or disk is full"  → StoreError::QuotaExceeded
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// Other                       → StoreError::OperationFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();
                // SQLITE_FULL surfaces as this message text
                if msg.contains("disk is full") || msg.contains("database or disk is full") {
                    StoreError::QuotaExceeded(msg)
                } else {
                    StoreError::OperationFailed(msg)
                }
            }
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),
            other => StoreError::OperationFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::EntryNotFound {
            offline_id: "1767225600000".into(),
        };
        assert_eq!(
            err.to_string(),
            "No queued sale with offline id 1767225600000"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let bad = serde_json::from_str::<i64>("not json").unwrap_err();
        let err: StoreError = bad.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
