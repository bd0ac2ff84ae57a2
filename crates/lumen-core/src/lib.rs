//! # lumen-core: Pure Business Logic for Lumen POS
//!
//! This crate is the **heart** of the offline-first checkout core. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Lumen POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                     Host UI Application                       │ │
//! │  │   Catalog UI ──► Checkout UI ──► Payment UI ──► Sync banner   │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                lumen-sync (CheckoutSession)                   │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │               ★ lumen-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────────────┐   │ │
//! │  │  │  draft  │ │ payment │ │ checkout │ │   order_number   │   │ │
//! │  │  │SaleDraft│ │Composer │ │  Steps   │ │ online / offline │   │ │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └──────────────────┘   │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`draft`] - SaleDraft, LineItem, and the cart aggregator
//! - [`payment`] - Payment entries and the paid/remaining composer
//! - [`checkout`] - The 3-step state machine and its guards
//! - [`order_number`] - Online / offline order-number derivation
//! - [`money`] - Integer-cents Money type (no floating point!)
//! - [`types`] - Customer, delivery-term, and configuration types
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, same input = same output
//! 2. **No I/O**: persistence and network live in the sibling crates
//! 3. **Integer Money**: every amount is cents (i64), never a float
//! 4. **Explicit Errors**: typed errors, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod draft;
pub mod error;
pub mod money;
pub mod order_number;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::CheckoutStep;
pub use draft::{LineItem, SaleDraft};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::Money;
pub use payment::Payment;
pub use types::{CustomerRef, DeferredPayment, DeliveryTerm, PaymentMethod, SaleConfig};
