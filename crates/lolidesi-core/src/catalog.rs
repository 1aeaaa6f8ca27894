//! # Catalog Views
//!
//! Read-only projections over the item list, employee directory, and
//! history sheet, as shown on the availability and history tabs.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Availability, CatalogItem, EmployeeDirectory, HistoryEntry};

/// Display name used when a history row has no actor.
pub const UNKNOWN_USER: &str = "Unknown";

// =============================================================================
// Availability
// =============================================================================

/// Filter chips on the availability tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFilter {
    #[default]
    All,
    Available,
    Borrowed,
}

impl AvailabilityFilter {
    pub fn matches(&self, availability: Availability) -> bool {
        match self {
            AvailabilityFilter::All => true,
            AvailabilityFilter::Available => availability == Availability::Available,
            AvailabilityFilter::Borrowed => availability == Availability::Borrowed,
        }
    }
}

/// One line of the availability list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRow {
    pub key: String,
    pub name: String,
    pub status: Availability,
    /// Borrower display name; only set for borrowed items.
    pub borrower: Option<String>,
}

/// Builds the filtered availability list, resolving borrower names.
pub fn availability_list(
    items: &[CatalogItem],
    directory: &EmployeeDirectory,
    filter: AvailabilityFilter,
) -> Vec<AvailabilityRow> {
    items
        .iter()
        .filter(|item| filter.matches(item.availability))
        .map(|item| AvailabilityRow {
            key: item.id.clone(),
            name: item.name.clone(),
            status: item.availability,
            borrower: match item.availability {
                Availability::Borrowed => item.borrowed_by.as_deref().map(|id| directory.resolve(id)),
                Availability::Available => None,
            },
        })
        .collect()
}

/// Items currently out with `emp_id`.
pub fn unreturned_items<'a>(items: &'a [CatalogItem], emp_id: &str) -> Vec<&'a CatalogItem> {
    items
        .iter()
        .filter(|item| {
            item.availability == Availability::Borrowed && item.borrowed_by.as_deref() == Some(emp_id)
        })
        .collect()
}

// =============================================================================
// History
// =============================================================================

/// A history row with the actor's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub key: String,
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub user_name: String,
}

/// Resolves actor names and sorts newest first.
///
/// Rows whose timestamp does not parse sort after every dated row,
/// keeping their original relative order.
pub fn history_rows(history: Vec<HistoryEntry>, directory: &EmployeeDirectory) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = history
        .into_iter()
        .map(|entry| {
            let user_name = match entry.by.as_deref() {
                Some(id) => directory.resolve(id),
                None => UNKNOWN_USER.to_string(),
            };
            HistoryRow {
                key: entry.key(),
                entry,
                user_name,
            }
        })
        .collect();

    rows.sort_by(|a, b| match (a.entry.timestamp(), b.entry.timestamp()) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
