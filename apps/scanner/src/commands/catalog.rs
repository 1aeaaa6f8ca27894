//! # Catalog Commands
//!
//! Read-only views over the backend sheets. The item list is also cached in
//! [`CatalogState`](crate::state::CatalogState) because scans are checked
//! against it.

use lolidesi_core::catalog::{
    availability_list, history_rows, unreturned_items, AvailabilityFilter, AvailabilityRow, HistoryRow,
};
use lolidesi_core::CatalogItem;
use tracing::debug;

use super::require_user;
use crate::error::ApiError;
use crate::state::AppState;

/// Fetches `read-item-list` and replaces the cached catalog.
pub async fn refresh_items(state: &AppState) -> Result<Vec<CatalogItem>, ApiError> {
    let items = state.api().read_items().await?;
    debug!(count = items.len(), "Catalog refreshed");
    state.catalog().replace(items.clone());
    Ok(items)
}

/// Availability screen: items with their borrower's name.
pub async fn availability(
    state: &AppState,
    filter: AvailabilityFilter,
) -> Result<Vec<AvailabilityRow>, ApiError> {
    let items = refresh_items(state).await?;
    let directory = state.api().read_users().await?;
    Ok(availability_list(&items, &directory, filter))
}

/// History screen, newest first.
pub async fn history(state: &AppState) -> Result<Vec<HistoryRow>, ApiError> {
    let entries = state.api().read_history().await?;
    let directory = state.api().read_users().await?;
    Ok(history_rows(entries, &directory))
}

/// Items the backend still shows as borrowed by the logged-in user.
pub async fn unreturned(state: &AppState) -> Result<Vec<CatalogItem>, ApiError> {
    let user = require_user(state).await?;
    let items = refresh_items(state).await?;
    Ok(unreturned_items(&items, &user.emp_id).into_iter().cloned().collect())
}
