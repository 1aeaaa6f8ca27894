//! # Scan Commands
//!
//! The borrow screen. Scanned codes are checked against the cached catalog
//! and collected until the user commits.
//!
//! ```text
//! ┌──────────┐  scan_code   ┌──────────┐   commit    ┌──────────────────┐
//! │  Empty   │─────────────►│ Scanning │────────────►│ Slot in ledger,  │
//! │ session  │◄─────────────│ (items,  │             │ session emptied  │
//! └──────────┘    clear     │  note)   │             └──────────────────┘
//!                           └──────────┘
//!                            remove / set_note
//! ```

use lolidesi_core::{BorrowSlot, ScannedItem};
use tracing::debug;

use super::catalog::refresh_items;
use super::require_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Adds a scanned QR payload to the working set.
///
/// Loads the catalog first if it has never been fetched.
///
/// ## Errors
/// - `NOT_FOUND` if no item has this id
/// - `BUSINESS_LOGIC` if the item is borrowed or already scanned
pub async fn scan_code(state: &AppState, code: &str) -> Result<Vec<ScannedItem>, ApiError> {
    debug!(code = %code, "scan_code command");
    if !state.catalog().is_loaded() {
        refresh_items(state).await?;
    }

    let code = code.trim();
    state.catalog().with_items(|catalog| {
        state.scan().with_session_mut(|session| -> Result<_, ApiError> {
            session.scan(code, catalog)?;
            Ok(session.items().to_vec())
        })
    })
}

/// Drops an item from the working set. Unknown ids are ignored.
pub fn remove(state: &AppState, item_id: &str) -> Vec<ScannedItem> {
    state.scan().with_session_mut(|session| {
        session.remove(item_id);
        session.items().to_vec()
    })
}

pub fn set_note(state: &AppState, note: &str) {
    state.scan().with_session_mut(|session| session.set_note(note));
}

/// Cancel: empties the working set, keeps the note.
pub fn clear(state: &AppState) {
    state.scan().with_session_mut(|session| session.clear_items());
}

pub fn items(state: &AppState) -> Vec<ScannedItem> {
    state.scan().with_session(|session| session.items().to_vec())
}

/// Borrows every scanned item for the logged-in user.
pub async fn commit(state: &AppState) -> Result<BorrowSlot, ApiError> {
    let user = require_user(state).await?;
    state.coordinator().commit_borrow(&user.emp_id).await
}
