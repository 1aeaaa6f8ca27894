//! # Borrow Ledger
//!
//! The local record of every committed borrow transaction ("slot") and how
//! much of it has come back.
//!
//! ## Slot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Slot Lifecycle                                  │
//! │                                                                         │
//! │  commit_borrow succeeds                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_slot() ──► { items: [A,B,C], returned: [] }                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  return_items([A,C]) ──► { items: [A,B,C], returned: [A,C] }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  return_items([B]) ──► { items: [A,B,C], returned: [A,C,B] }  (done)    │
//! │                                                                         │
//! │  Slots are never deleted. `items` never changes. `returned` only grows. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This type is plain state. Persistence is layered on top by
//! `lolidesi_store::LedgerStore`, which saves after every mutation.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::types::{BorrowSlot, ScannedItem};

/// All borrow slots plus the slot currently open on the return screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowLedger {
    #[serde(default)]
    slots: Vec<BorrowSlot>,

    /// Navigation state, persisted alongside the slots.
    #[serde(default)]
    selected_slot_id: Option<String>,
}

impl BorrowLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a new slot and returns it.
    ///
    /// Existing slots are left untouched. The slot id is a fresh UUID v4.
    pub fn add_slot(
        &mut self,
        items: Vec<ScannedItem>,
        note: Option<String>,
        user_id: impl Into<String>,
    ) -> &BorrowSlot {
        let slot = BorrowSlot {
            id: Uuid::new_v4().to_string(),
            items,
            returned: Vec::new(),
            note,
            user_id: user_id.into(),
        };

        debug!(slot_id = %slot.id, items = slot.items.len(), "Adding borrow slot");

        self.slots.push(slot);
        &self.slots[self.slots.len() - 1]
    }

    /// Records returned items against a slot.
    ///
    /// ## Behavior
    /// - Unknown `slot_id`: no-op, returns `false`
    /// - Items not borrowed in this slot are ignored
    /// - Items already returned (or repeated in `returned_items`) are ignored
    ///
    /// Returns `true` if the slot was found.
    pub fn return_items(&mut self, slot_id: &str, returned_items: &[ScannedItem]) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == slot_id) else {
            debug!(slot_id = %slot_id, "Return for unknown slot ignored");
            return false;
        };

        for item in returned_items {
            if slot.contains(&item.id) && !slot.is_returned(&item.id) {
                slot.returned.push(item.clone());
            }
        }

        debug!(
            slot_id = %slot_id,
            returned = slot.returned.len(),
            total = slot.items.len(),
            "Recorded return"
        );
        true
    }

    /// Sets or clears the selected slot.
    pub fn set_selected_slot_id(&mut self, id: Option<String>) {
        self.selected_slot_id = id;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All slots in creation order.
    pub fn slots(&self) -> &[BorrowSlot] {
        &self.slots
    }

    pub fn slot(&self, id: &str) -> Option<&BorrowSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn selected_slot_id(&self) -> Option<&str> {
        self.selected_slot_id.as_deref()
    }

    /// The selected slot, if the id still resolves.
    pub fn selected_slot(&self) -> Option<&BorrowSlot> {
        self.selected_slot_id().and_then(|id| self.slot(id))
    }

    /// Slots borrowed by `user_id`, in creation order.
    pub fn slots_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a BorrowSlot> {
        self.slots.iter().filter(move |s| s.user_id == user_id)
    }

    /// True if `user_id` still has anything out.
    pub fn has_outstanding(&self, user_id: &str) -> bool {
        self.slots_for_user(user_id).any(|s| !s.is_fully_returned())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<ScannedItem> {
        ids.iter()
            .map(|id| ScannedItem::new(*id, format!("Item {}", id)))
            .collect()
    }

    #[test]
    fn test_add_slot_appends_and_preserves_existing() {
        let mut ledger = BorrowLedger::new();
        let first = ledger.add_slot(items(&["A", "B"]), Some("site visit".into()), "E1").clone();

        for n in 0..5 {
            ledger.add_slot(items(&["C"]), None, format!("E{}", n));
        }

        assert_eq!(ledger.len(), 6);
        assert_eq!(ledger.slots()[0], first);
        assert!(first.returned.is_empty());
    }

    #[test]
    fn test_slot_ids_are_unique() {
        let mut ledger = BorrowLedger::new();
        let a = ledger.add_slot(items(&["A"]), None, "E1").id.clone();
        let b = ledger.add_slot(items(&["A"]), None, "E1").id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_return_items_appends_in_order() {
        let mut ledger = BorrowLedger::new();
        let id = ledger.add_slot(items(&["A", "B", "C"]), None, "E1").id.clone();

        assert!(ledger.return_items(&id, &items(&["C", "A"])));

        let slot = ledger.slot(&id).unwrap();
        let returned: Vec<_> = slot.returned.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(returned, vec!["C", "A"]);
        assert!(!slot.is_fully_returned());
    }

    #[test]
    fn test_return_items_unknown_slot_is_noop() {
        let mut ledger = BorrowLedger::new();
        ledger.add_slot(items(&["A"]), None, "E1");
        let before = ledger.clone();

        assert!(!ledger.return_items("missing", &items(&["A"])));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_returned_stays_subset_of_items() {
        let mut ledger = BorrowLedger::new();
        let id = ledger.add_slot(items(&["A", "B"]), None, "E1").id.clone();

        ledger.return_items(&id, &items(&["A", "A", "X"]));
        ledger.return_items(&id, &items(&["A", "B", "B"]));

        let slot = ledger.slot(&id).unwrap();
        assert_eq!(slot.returned.len(), 2);
        assert!(slot.returned.iter().all(|r| slot.contains(&r.id)));
        assert!(slot.is_fully_returned());
    }

    #[test]
    fn test_return_does_not_touch_other_slots() {
        let mut ledger = BorrowLedger::new();
        let a = ledger.add_slot(items(&["A"]), None, "E1").id.clone();
        let b = ledger.add_slot(items(&["A"]), None, "E2").id.clone();

        ledger.return_items(&a, &items(&["A"]));

        assert!(ledger.slot(&a).unwrap().is_fully_returned());
        assert!(ledger.slot(&b).unwrap().returned.is_empty());
    }

    #[test]
    fn test_selection_and_user_views() {
        let mut ledger = BorrowLedger::new();
        let mine = ledger.add_slot(items(&["A"]), None, "E1").id.clone();
        ledger.add_slot(items(&["B"]), None, "E2");

        ledger.set_selected_slot_id(Some(mine.clone()));
        assert_eq!(ledger.selected_slot().map(|s| s.id.as_str()), Some(mine.as_str()));

        assert_eq!(ledger.slots_for_user("E1").count(), 1);
        assert!(ledger.has_outstanding("E1"));

        ledger.return_items(&mine, &items(&["A"]));
        assert!(!ledger.has_outstanding("E1"));

        ledger.set_selected_slot_id(None);
        assert!(ledger.selected_slot().is_none());
    }

    #[test]
    fn test_serde_shape() {
        let mut ledger = BorrowLedger::new();
        ledger.add_slot(items(&["A"]), None, "E1");

        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json["slots"].is_array());
        assert!(json["selectedSlotId"].is_null());

        let back: BorrowLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
