//! # Test Support
//!
//! In-memory collaborator fakes and draft builders shared by the unit
//! tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::backend::{
    DeliveryRecord, NotificationPayload, Notifier, SaleRecord, SystemOfRecord,
};
use crate::error::{SyncError, SyncResult};
use lumen_core::{CustomerRef, DeliveryTerm, PaymentMethod, SaleDraft};

/// Installs a fmt subscriber once so `RUST_LOG=debug cargo test` shows the
/// flow's tracing output.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lets detached tasks (the fire-and-forget notification) run to
/// completion on the test runtime.
pub async fn settle_background_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// A structurally valid draft: 2 units of "p1" at 100.00, a customer with
/// phone and address, the given delivery term, and one cash payment.
pub fn valid_draft(term: DeliveryTerm) -> SaleDraft {
    let mut draft = SaleDraft::new("matriz", Utc::now().date_naive());
    draft.add_item("p1", "Sofa", 10_000);
    draft.add_item("p1", "Sofa", 10_000);
    draft.set_customer(CustomerRef {
        id: "c1".into(),
        name: "Ana".into(),
        phone: Some("+55 11 91234-0000".into()),
        address: Some("Rua A, 10 - Centro".into()),
    });
    draft.set_delivery_term(term);
    draft
        .add_payment(PaymentMethod::Cash, 10_000, 1)
        .expect("positive payment");
    draft
}

// =============================================================================
// Fake System of Record
// =============================================================================

/// Records every call so tests can assert on the exact collaborator
/// traffic a flow produced.
#[derive(Default)]
pub struct FakeBackend {
    latest: Mutex<Option<String>>,
    sales: Mutex<Vec<SaleRecord>>,
    deliveries: Mutex<Vec<DeliveryRecord>>,
    stock: Mutex<HashMap<String, i64>>,
    stock_updates: Mutex<Vec<(String, i64)>>,
    fail_create_sale: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend::default()
    }

    pub fn set_latest_order_number(&self, number: &str) {
        *self.latest.lock().unwrap() = Some(number.to_string());
    }

    pub fn set_stock(&self, product_ref: &str, stock: i64) {
        self.stock
            .lock()
            .unwrap()
            .insert(product_ref.to_string(), stock);
    }

    /// Current stock level; products never seeded report zero.
    pub fn stock(&self, product_ref: &str) -> i64 {
        self.stock
            .lock()
            .unwrap()
            .get(product_ref)
            .copied()
            .unwrap_or(0)
    }

    pub fn sales(&self) -> Vec<SaleRecord> {
        self.sales.lock().unwrap().clone()
    }

    pub fn deliveries(&self) -> Vec<DeliveryRecord> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Every stock write, in call order.
    pub fn stock_updates(&self) -> Vec<(String, i64)> {
        self.stock_updates.lock().unwrap().clone()
    }

    /// Makes subsequent create_sale calls fail like a dropped connection.
    pub fn set_fail_create_sale(&self, fail: bool) {
        self.fail_create_sale.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SystemOfRecord for FakeBackend {
    async fn latest_order_number(&self) -> SyncResult<Option<String>> {
        Ok(self.latest.lock().unwrap().clone())
    }

    async fn create_sale(&self, sale: &SaleRecord) -> SyncResult<()> {
        if self.fail_create_sale.load(Ordering::SeqCst) {
            return Err(SyncError::Network("simulated: connection dropped".into()));
        }
        *self.latest.lock().unwrap() = Some(sale.order_number.clone());
        self.sales.lock().unwrap().push(sale.clone());
        Ok(())
    }

    async fn product_stock(&self, product_ref: &str) -> SyncResult<i64> {
        Ok(self.stock(product_ref))
    }

    async fn update_product_stock(&self, product_ref: &str, new_stock: i64) -> SyncResult<()> {
        self.stock
            .lock()
            .unwrap()
            .insert(product_ref.to_string(), new_stock);
        self.stock_updates
            .lock()
            .unwrap()
            .push((product_ref.to_string(), new_stock));
        Ok(())
    }

    async fn create_delivery(&self, delivery: &DeliveryRecord) -> SyncResult<()> {
        self.deliveries.lock().unwrap().push(delivery.clone());
        Ok(())
    }
}

// =============================================================================
// Fake Notifier
// =============================================================================

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<NotificationPayload>>,
    fail: AtomicBool,
}

impl FakeNotifier {
    pub fn new() -> Self {
        FakeNotifier::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, payload: NotificationPayload) -> SyncResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Notification("simulated: dispatcher down".into()));
        }
        self.sent.lock().unwrap().push(payload);
        Ok(())
    }
}
