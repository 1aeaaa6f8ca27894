//! # Ledger State
//!
//! The persisted borrow ledger, shared between commands.
//!
//! `LedgerStore` writes to SQLite on every mutation, so the lock is an async
//! mutex: it is held across the write.

use std::sync::Arc;

use lolidesi_core::BorrowLedger;
use lolidesi_store::LedgerStore;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct LedgerState {
    store: Arc<Mutex<LedgerStore>>,
}

impl LedgerState {
    pub fn new(store: LedgerStore) -> Self {
        LedgerState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for reads followed by writes.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let mut ledger = state.ledger().lock().await;
    /// ledger.set_selected_slot_id(None).await?;
    /// ```
    pub async fn lock(&self) -> MutexGuard<'_, LedgerStore> {
        self.store.lock().await
    }

    /// Copy of the current ledger.
    pub async fn snapshot(&self) -> BorrowLedger {
        self.store.lock().await.snapshot()
    }
}
