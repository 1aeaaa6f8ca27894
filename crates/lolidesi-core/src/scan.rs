//! # Working Sets
//!
//! In-progress selections that exist before anything is committed:
//!
//! - [`ScanSession`]: items scanned on the borrow screen, plus the note
//! - [`ReturnSelection`]: items ticked on the return screen, plus the note
//!
//! ## Scan Checks
//! ```text
//! QR payload "A-7"
//!      │
//!      ├── not in catalog?       → CoreError::ItemNotFound
//!      ├── statusAvailability 0? → CoreError::ItemUnavailable
//!      ├── already scanned?      → CoreError::AlreadyScanned
//!      │
//!      └── OK → push { id, name }
//! ```
//!
//! The duplicate check here is what keeps a slot's `items` free of repeated
//! ids; the ledger itself does not re-check.

use crate::error::{CoreError, CoreResult};
use crate::types::{BorrowSlot, CatalogItem, ScannedItem};
use crate::validation::normalize_note;

// =============================================================================
// Scan Session
// =============================================================================

/// Items scanned for the next borrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    items: Vec<ScannedItem>,
    note: String,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a scanned code against the catalog and adds the item.
    pub fn scan(&mut self, code: &str, catalog: &[CatalogItem]) -> CoreResult<&ScannedItem> {
        let found = catalog
            .iter()
            .find(|item| item.id == code)
            .ok_or_else(|| CoreError::ItemNotFound(code.to_string()))?;

        if !found.is_available() {
            return Err(CoreError::ItemUnavailable {
                id: found.id.clone(),
                name: found.name.clone(),
            });
        }

        if self.contains(code) {
            return Err(CoreError::AlreadyScanned {
                id: found.id.clone(),
                name: found.name.clone(),
            });
        }

        self.items.push(ScannedItem::from(found));
        Ok(&self.items[self.items.len() - 1])
    }

    /// Removes a scanned item. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Drops every scanned item (cancel, or after a successful borrow).
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// The note as typed.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Trimmed note, `None` when blank.
    pub fn normalized_note(&self) -> Option<String> {
        normalize_note(&self.note)
    }
}

// =============================================================================
// Return Selection
// =============================================================================

/// Items ticked for return from the selected slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnSelection {
    items: Vec<ScannedItem>,
    note: String,
}

impl ReturnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the item if absent, removes it if present.
    pub fn toggle(&mut self, item: &ScannedItem) {
        if self.is_selected(&item.id) {
            self.items.retain(|i| i.id != item.id);
        } else {
            self.items.push(item.clone());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// True if every outstanding item of `slot` is selected.
    pub fn all_selected(&self, slot: &BorrowSlot) -> bool {
        slot.outstanding_items()
            .iter()
            .all(|item| self.is_selected(&item.id))
    }

    /// Selects every outstanding item, or clears if all were selected.
    pub fn toggle_all(&mut self, slot: &BorrowSlot) {
        if self.all_selected(slot) {
            self.items.clear();
        } else {
            self.items = slot.outstanding_items();
        }
    }

    pub fn items(&self) -> &[ScannedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Clears items and note.
    pub fn reset(&mut self) {
        self.items.clear();
        self.note.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Availability;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem {
                id: "A-1".into(),
                name: "Drill".into(),
                availability: Availability::Available,
                borrowed_by: None,
            },
            CatalogItem {
                id: "A-2".into(),
                name: "Ladder".into(),
                availability: Availability::Borrowed,
                borrowed_by: Some("EMP07".into()),
            },
        ]
    }

    #[test]
    fn test_scan_accepts_available_item() {
        let mut session = ScanSession::new();
        let item = session.scan("A-1", &catalog()).unwrap();
        assert_eq!(item, &ScannedItem::new("A-1", "Drill"));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_scan_rejections() {
        let mut session = ScanSession::new();
        let catalog = catalog();

        assert!(matches!(session.scan("Z-9", &catalog), Err(CoreError::ItemNotFound(_))));
        assert!(matches!(
            session.scan("A-2", &catalog),
            Err(CoreError::ItemUnavailable { .. })
        ));

        session.scan("A-1", &catalog).unwrap();
        assert!(matches!(
            session.scan("A-1", &catalog),
            Err(CoreError::AlreadyScanned { .. })
        ));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut session = ScanSession::new();
        session.scan("A-1", &catalog()).unwrap();
        session.set_note("  for site B  ");

        assert!(session.remove("A-1"));
        assert!(!session.remove("A-1"));

        session.scan("A-1", &catalog()).unwrap();
        session.clear_items();
        assert!(session.is_empty());
        assert_eq!(session.normalized_note().as_deref(), Some("for site B"));
    }

    #[test]
    fn test_return_selection_toggle_all() {
        let slot = BorrowSlot {
            id: "s".into(),
            items: vec![
                ScannedItem::new("A", "a"),
                ScannedItem::new("B", "b"),
                ScannedItem::new("C", "c"),
            ],
            returned: vec![ScannedItem::new("B", "b")],
            note: None,
            user_id: "E1".into(),
        };

        let mut selection = ReturnSelection::new();
        selection.toggle(&ScannedItem::new("A", "a"));
        assert!(!selection.all_selected(&slot));

        selection.toggle_all(&slot);
        assert_eq!(selection.items().len(), 2);
        assert!(selection.all_selected(&slot));

        selection.toggle_all(&slot);
        assert!(selection.is_empty());

        selection.toggle(&ScannedItem::new("C", "c"));
        selection.toggle(&ScannedItem::new("C", "c"));
        assert!(selection.is_empty());
    }
}
