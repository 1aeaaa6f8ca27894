//! # Return Commands
//!
//! The return screen: pick one of your open slots, tick the items you are
//! bringing back, then commit.
//!
//! ## User Workflow
//! ```text
//! my_slots() ──► select_slot(id) ──► toggle(item) / toggle_all()
//!                      │                         │
//!                      │ (clears ticks)          ▼
//!                      │                    set_note(text)
//!                      ▼                         │
//!              selectedSlotId persisted          ▼
//!                                             commit()
//! ```

use lolidesi_core::{BorrowSlot, CoreError, ScannedItem};
use tracing::debug;

use super::require_user;
use crate::coordinator::ReturnReport;
use crate::error::ApiError;
use crate::state::AppState;

/// The user's slots that still have items out, oldest first.
pub async fn my_slots(state: &AppState) -> Result<Vec<BorrowSlot>, ApiError> {
    let user = require_user(state).await?;
    let ledger = state.ledger().snapshot().await;
    Ok(ledger
        .slots_for_user(&user.emp_id)
        .filter(|slot| !slot.is_fully_returned())
        .cloned()
        .collect())
}

/// Selects a slot for return and clears any previous ticks.
pub async fn select_slot(state: &AppState, slot_id: &str) -> Result<BorrowSlot, ApiError> {
    debug!(slot_id = %slot_id, "select_slot command");
    let mut ledger = state.ledger().lock().await;
    let slot = ledger
        .ledger()
        .slot(slot_id)
        .cloned()
        .ok_or_else(|| CoreError::SlotNotFound(slot_id.to_string()))?;

    ledger.set_selected_slot_id(Some(slot.id.clone())).await?;
    drop(ledger);

    state.returns().with_selection_mut(|s| s.reset());
    Ok(slot)
}

async fn selected_slot(state: &AppState) -> Result<BorrowSlot, ApiError> {
    let guard = state.ledger().lock().await;
    let ledger = guard.ledger();
    let id = ledger.selected_slot_id().ok_or(CoreError::NoSlotSelected)?;
    let slot = ledger
        .slot(id)
        .cloned()
        .ok_or_else(|| CoreError::SlotNotFound(id.to_string()))?;
    Ok(slot)
}

/// Ticks or unticks one outstanding item of the selected slot.
pub async fn toggle(state: &AppState, item_id: &str) -> Result<Vec<ScannedItem>, ApiError> {
    let slot = selected_slot(state).await?;
    let item = slot
        .outstanding_items()
        .into_iter()
        .find(|i| i.id == item_id)
        .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

    Ok(state.returns().with_selection_mut(|s| {
        s.toggle(&item);
        s.items().to_vec()
    }))
}

/// Ticks every outstanding item, or unticks all if they already are.
pub async fn toggle_all(state: &AppState) -> Result<Vec<ScannedItem>, ApiError> {
    let slot = selected_slot(state).await?;
    Ok(state.returns().with_selection_mut(|s| {
        s.toggle_all(&slot);
        s.items().to_vec()
    }))
}

pub fn set_note(state: &AppState, note: &str) {
    state.returns().with_selection_mut(|s| s.set_note(note));
}

pub async fn commit(state: &AppState) -> Result<ReturnReport, ApiError> {
    let user = require_user(state).await?;
    state.coordinator().commit_return(&user.emp_id).await
}
