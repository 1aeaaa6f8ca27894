//! # Domain Types
//!
//! Core domain types used throughout LoLiDesi.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ScannedItem    │   │   BorrowSlot    │   │  CatalogItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (business)  │   │  id (UUID)      │   │  id, name       │       │
//! │  │  name           │   │  items          │   │  availability   │       │
//! │  └─────────────────┘   │  returned       │   │  borrowed_by    │       │
//! │                        │  note, user_id  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Availability   │   │  HistoryEntry   │   │   Employee      │       │
//! │  │  Borrowed = 0   │   │  log/item id    │   │  id, name       │       │
//! │  │  Available = 1  │   │  status, time   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Item ids are business identifiers printed in the QR codes; they are
//! unique within the catalog, not globally.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Scanned Item
// =============================================================================

/// A reference to a physical item captured by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScannedItem {
    /// Business identifier (the QR payload).
    pub id: String,

    /// Display name at time of scanning.
    pub name: String,
}

impl ScannedItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ScannedItem {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&CatalogItem> for ScannedItem {
    fn from(item: &CatalogItem) -> Self {
        ScannedItem::new(item.id.clone(), item.name.clone())
    }
}

// =============================================================================
// Borrow Slot
// =============================================================================

/// One committed borrow transaction.
///
/// ## Invariants
/// - `items` is fixed at creation
/// - `returned` only grows, and every entry's id appears in `items`
/// - fully returned iff every id in `items` appears in `returned`, which for
///   deduplicated returns is `returned.len() == items.len()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowSlot {
    pub id: String,
    pub items: Vec<ScannedItem>,
    #[serde(default)]
    pub returned: Vec<ScannedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub user_id: String,
}

impl BorrowSlot {
    /// Returns true once every borrowed item has been returned.
    pub fn is_fully_returned(&self) -> bool {
        self.items.iter().all(|item| self.is_returned(&item.id))
    }

    /// Returns true if `item_id` has already been returned from this slot.
    pub fn is_returned(&self, item_id: &str) -> bool {
        self.returned.iter().any(|r| r.id == item_id)
    }

    /// Returns true if `item_id` was borrowed in this slot.
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.id == item_id)
    }

    /// Items still out, in original scan order.
    pub fn outstanding_items(&self) -> Vec<ScannedItem> {
        self.items
            .iter()
            .filter(|item| !self.is_returned(&item.id))
            .cloned()
            .collect()
    }

    /// Return progress as `(returned, total)`, counting each borrowed item once.
    pub fn progress(&self) -> (usize, usize) {
        let returned = self.items.iter().filter(|item| self.is_returned(&item.id)).count();
        (returned, self.items.len())
    }
}

// =============================================================================
// Availability
// =============================================================================

/// Availability flag stored in the `statusAvailability` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Code `0`: someone has the item.
    Borrowed,
    /// Code `1`: on the shelf.
    Available,
}

impl Availability {
    /// Maps the backend's integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Availability::Borrowed),
            1 => Some(Availability::Available),
            _ => None,
        }
    }

    /// The integer code sent to the backend.
    #[inline]
    pub const fn code(&self) -> i64 {
        match self {
            Availability::Borrowed => 0,
            Availability::Available => 1,
        }
    }

    /// Label shown in the availability list.
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Borrowed => "Borrowed",
            Availability::Available => "Available",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// An item row from `read-item-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub availability: Availability,
    /// Employee id of the current borrower, if the sheet records one.
    pub borrowed_by: Option<String>,
}

impl CatalogItem {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}

// =============================================================================
// Employees
// =============================================================================

/// An employee row from `read-users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
}

/// Employee id → display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDirectory {
    names: HashMap<String, String>,
}

impl EmployeeDirectory {
    /// Looks up a display name.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display name, falling back to the raw id.
    pub fn resolve(&self, id: &str) -> String {
        self.name_of(id).unwrap_or(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<Employee> for EmployeeDirectory {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        EmployeeDirectory {
            names: iter.into_iter().map(|e| (e.id, e.name)).collect(),
        }
    }
}

/// The logged-in employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub emp_id: String,
    pub emp_name: String,
}

// =============================================================================
// History
// =============================================================================

/// Kind of event recorded in the history sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Borrow,
    Return,
    /// Anything else the sheet contains, kept verbatim.
    Other(String),
}

impl HistoryStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "borrow" => HistoryStatus::Borrow,
            "return" => HistoryStatus::Return,
            _ => HistoryStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HistoryStatus::Borrow => "borrow",
            HistoryStatus::Return => "return",
            HistoryStatus::Other(raw) => raw,
        }
    }
}

/// One borrow or return event from `read-history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub log_id: String,
    pub item_id: String,
    pub status: HistoryStatus,
    /// Timestamp as written by the backend.
    pub time: String,
    pub by: Option<String>,
    pub notes: Option<String>,
}

impl HistoryEntry {
    /// List key: `{logID}-{itemID}-{status}`.
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.log_id, self.item_id, self.status.as_str())
    }

    /// Parses `time` as RFC 3339, falling back to a naive `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.time.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
