//! # Working Sets
//!
//! The scan session (borrow screen) and the return selection (return
//! screen). Both are in-memory only and lost on restart.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell Action            Command                  State Change          │
//! │  ────────────            ───────                  ────────────          │
//! │                                                                         │
//! │  QR decoded ───────────► scan::scan_code() ─────► session.scan(code)    │
//! │  Tap ✕ on item ────────► scan::remove() ────────► session.remove(id)    │
//! │  Type note ────────────► scan::set_note() ──────► session.note = ..     │
//! │  Tick item ────────────► returns::toggle() ─────► selection.toggle(..)  │
//! │  Tick "all" ───────────► returns::toggle_all() ─► selection.toggle_all  │
//! │                                                                         │
//! │  Locks are held only for the closure, never across an await.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lolidesi_core::{ReturnSelection, ScanSession};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Scan State
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ScanState {
    session: Arc<Mutex<ScanSession>>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the scan session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ScanSession) -> R,
    {
        f(&lock(&self.session))
    }

    /// Executes a function with write access to the scan session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ScanSession) -> R,
    {
        f(&mut lock(&self.session))
    }
}

// =============================================================================
// Return State
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReturnState {
    selection: Arc<Mutex<ReturnSelection>>,
}

impl ReturnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ReturnSelection) -> R,
    {
        f(&lock(&self.selection))
    }

    pub fn with_selection_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ReturnSelection) -> R,
    {
        f(&mut lock(&self.selection))
    }
}
