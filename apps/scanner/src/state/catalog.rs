//! # Catalog State
//!
//! Last item list fetched from the server. Scans are validated against it.

use std::sync::{Arc, PoisonError, RwLock};

use lolidesi_core::{Availability, CatalogItem};

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    items: Arc<RwLock<Vec<CatalogItem>>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached list.
    pub fn replace(&self, items: Vec<CatalogItem>) {
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    pub fn with_items<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[CatalogItem]) -> R,
    {
        f(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_loaded(&self) -> bool {
        self.with_items(|items| !items.is_empty())
    }

    /// Applies a committed borrow or return to the cached rows, so the next
    /// scan sees the new status without a refetch.
    pub fn mark<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a str>,
        availability: Availability,
        borrowed_by: Option<&str>,
    ) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        for id in ids {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.availability = availability;
                item.borrowed_by = borrowed_by.map(str::to_string);
            }
        }
    }
}
