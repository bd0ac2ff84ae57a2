//! # Order Number Allocator
//!
//! Session-scoped allocation state over the pure derivation functions in
//! lumen-core.
//!
//! ## Allocation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Order Number Allocator                            │
//! │                                                                     │
//! │  Session start ──► seed(): one "list most recent sale" call         │
//! │                          └──► cached last_known_max                 │
//! │                                                                     │
//! │  Each online commit ──► next_online(): local increment of the       │
//! │                         cached maximum, NO re-fetch                 │
//! │                                                                     │
//! │  Offline finalize ──► offline_placeholder(): "OFF-####" from the    │
//! │                       local clock; replaced at drain time           │
//! │                                                                     │
//! │  Two terminals committing concurrently CAN allocate the same        │
//! │  number; the design accepts that race rather than locking the       │
//! │  externally-owned sequence.                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use tracing::info;

use crate::backend::SystemOfRecord;
use crate::error::SyncResult;
use lumen_core::order_number;

/// Allocates online order numbers from a session-start snapshot of the
/// central sequence.
#[derive(Debug)]
pub struct OrderNumberAllocator {
    last_known_max: AtomicU32,
}

impl OrderNumberAllocator {
    /// Creates an allocator from an already-observed maximum.
    pub fn new(last_known_max: u32) -> Self {
        OrderNumberAllocator {
            last_known_max: AtomicU32::new(last_known_max),
        }
    }

    /// Seeds the allocator from the system of record's most recent sale.
    ///
    /// Called once at session start. An empty system of record (or an
    /// unparseable latest number) seeds at zero, so the first allocation
    /// is "00001".
    pub async fn seed(backend: &dyn SystemOfRecord) -> SyncResult<Self> {
        let latest = backend.latest_order_number().await?;
        let max = latest
            .as_deref()
            .and_then(order_number::parse_online)
            .unwrap_or(0);

        info!(last_known_max = max, "Order number allocator seeded");
        Ok(OrderNumberAllocator::new(max))
    }

    /// Allocates the next online order number and advances the cached
    /// maximum.
    pub fn next_online(&self) -> String {
        let previous = self.last_known_max.fetch_add(1, Ordering::SeqCst);
        order_number::next_online(previous)
    }

    /// Builds an offline placeholder from the current local clock.
    pub fn offline_placeholder(&self) -> String {
        order_number::offline_placeholder(Utc::now().timestamp())
    }

    /// The currently cached maximum (diagnostics only).
    pub fn last_known_max(&self) -> u32 {
        self.last_known_max.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation_from_snapshot() {
        let allocator = OrderNumberAllocator::new(42);

        assert_eq!(allocator.next_online(), "00043");
        assert_eq!(allocator.next_online(), "00044");
        assert_eq!(allocator.last_known_max(), 44);
    }

    #[test]
    fn test_first_allocation_on_empty_sequence() {
        let allocator = OrderNumberAllocator::new(0);
        assert_eq!(allocator.next_online(), "00001");
    }

    #[test]
    fn test_offline_placeholder_shape() {
        let allocator = OrderNumberAllocator::new(0);
        let placeholder = allocator.offline_placeholder();

        assert!(placeholder.starts_with("OFF-"));
        assert_eq!(placeholder.len(), 8);
        assert!(placeholder[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_seed_from_most_recent_sale() {
        let backend = crate::testing::FakeBackend::new();
        backend.set_latest_order_number("00042");

        let allocator = OrderNumberAllocator::seed(&backend).await.unwrap();
        assert_eq!(allocator.next_online(), "00043");
    }

    #[tokio::test]
    async fn test_seed_from_empty_system_of_record() {
        let backend = crate::testing::FakeBackend::new();

        let allocator = OrderNumberAllocator::seed(&backend).await.unwrap();
        assert_eq!(allocator.next_online(), "00001");
    }
}
