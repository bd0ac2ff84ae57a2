//! # lumen-store: Local Persistence for Lumen POS
//!
//! Restart-durable local state for the checkout terminal: the session-scoped
//! draft snapshot and the device-scoped offline durable queue, both kept as
//! structured-text records under fixed keys behind an injected storage port.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Lumen POS Data Flow                            │
//! │                                                                     │
//! │  CheckoutSession (lumen-sync)                                       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                   lumen-store (THIS CRATE)                    │ │
//! │  │                                                               │ │
//! │  │  ┌────────────┐   ┌──────────────┐   ┌────────────────────┐  │ │
//! │  │  │ DraftStore │   │ OfflineQueue │   │   StoragePort      │  │ │
//! │  │  │ (draft.rs) │   │  (queue.rs)  │   │   (port.rs)        │  │ │
//! │  │  │            │   │              │   │                    │  │ │
//! │  │  │ snapshot / │   │ enqueue /    │──►│ SqliteStore (WAL)  │  │ │
//! │  │  │ restore    │──►│ list/remove  │   │ MemoryStore (test) │  │ │
//! │  │  └────────────┘   └──────────────┘   └────────────────────┘  │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite file (survives reload, not device loss)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`port`] - Storage port trait + in-memory backend
//! - [`sqlite`] - SQLite backend, pool configuration, migrations
//! - [`draft`] - Draft snapshot store (crash/reload recovery)
//! - [`queue`] - Offline durable queue (sales awaiting submission)
//! - [`error`] - Storage error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod port;
pub mod queue;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use draft::{DraftStore, DRAFT_KEY};
pub use error::{StoreError, StoreResult};
pub use port::{MemoryStore, StoragePort};
pub use queue::{OfflineQueue, OfflineQueueEntry, QUEUE_KEY};
pub use sqlite::{SqliteStore, StoreConfig};
