//! # Borrow Coordinator
//!
//! Turns the working sets into remote updates and ledger entries.
//!
//! ## Borrow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      commit_borrow(user)                                │
//! │                                                                         │
//! │  scanned = [A, B, C, D]        (empty? → "No items scanned!")           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Saga (sequential, one timestamp for all)                               │
//! │    update-item A {0, ts, user, note} ✓                                  │
//! │    update-item B {0, ts, user, note} ✓                                  │
//! │    update-item C {0, ts, user, note} ✗ ──► release B, release A         │
//! │       │                                    (status 1, blank fields)     │
//! │       │                                          │                      │
//! │       ▼                                          ▼                      │
//! │  all ✓: add_slot, clear selection,    BORROW_FAILED naming C,           │
//! │         mark catalog rows borrowed,   ledger untouched                  │
//! │         drop committed scans                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Return
//! ```text
//! selected slot + ticked items
//!       │
//!       ▼
//! return-item × N  (concurrent, failures logged only)
//!       │
//!       ▼
//! return_items(slot, ticked) ──► clear slot selection ──► mark catalog rows available
//!       │
//!       ▼
//! reset selection + note
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use lolidesi_core::validation::validate_borrow_items;
use lolidesi_core::{Availability, BorrowSlot, CoreError, Saga, SagaOutcome, SagaStep};
use lolidesi_remote::{wire_timestamp, InventoryApi, RemoteError, ReturnItemRequest, UpdateItemRequest};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{BusyFlag, CatalogState, LedgerState, ReturnState, ScanState};

// =============================================================================
// Saga Step
// =============================================================================

/// Marks one item borrowed; compensation puts it back on the shelf.
struct BorrowItemStep {
    api: Arc<dyn InventoryApi>,
    request: UpdateItemRequest,
}

#[async_trait]
impl SagaStep for BorrowItemStep {
    type Error = RemoteError;

    fn id(&self) -> &str {
        &self.request.item_id
    }

    async fn forward(&self) -> Result<(), RemoteError> {
        self.api.update_item(&self.request).await
    }

    async fn compensate(&self) -> Result<(), RemoteError> {
        self.api
            .update_item(&UpdateItemRequest::release(self.request.item_id.clone()))
            .await
    }
}

// =============================================================================
// Return Report
// =============================================================================

/// What a return commit did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReport {
    pub slot_id: String,
    /// Item ids recorded as returned in the ledger.
    pub returned: Vec<String>,
    /// Item ids whose `return-item` call failed. Still recorded locally.
    pub failed: Vec<String>,
}

// =============================================================================
// Coordinator
// =============================================================================

#[derive(Clone)]
pub struct BorrowCoordinator {
    api: Arc<dyn InventoryApi>,
    ledger: LedgerState,
    scan: ScanState,
    returns: ReturnState,
    catalog: CatalogState,
    busy: BusyFlag,
}

impl BorrowCoordinator {
    pub fn new(
        api: Arc<dyn InventoryApi>,
        ledger: LedgerState,
        scan: ScanState,
        returns: ReturnState,
        catalog: CatalogState,
        busy: BusyFlag,
    ) -> Self {
        BorrowCoordinator {
            api,
            ledger,
            scan,
            returns,
            catalog,
            busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Borrows every scanned item for `user_id`, or none of them.
    ///
    /// ## Flow
    /// 1. Reject an empty scan list before any network call
    /// 2. Run one `update-item` per item, in scan order, via [`Saga`]
    /// 3. On failure, the saga has already released the earlier items
    /// 4. On success, record the slot, mark the items borrowed in the cached
    ///    catalog and drop them from the working set
    ///
    /// Codes scanned while the commit is in flight stay in the working set.
    pub async fn commit_borrow(&self, user_id: &str) -> Result<BorrowSlot, ApiError> {
        let (items, note, slot_note) = self.scan.with_session(|s| {
            (s.items().to_vec(), s.note().to_string(), s.normalized_note())
        });
        validate_borrow_items(&items)?;

        let _guard = self.busy.try_acquire().ok_or_else(ApiError::busy)?;

        let borrowed_time = wire_timestamp(Utc::now());
        info!(count = items.len(), user_id = %user_id, "Committing borrow");

        let steps = items
            .iter()
            .map(|item| BorrowItemStep {
                api: self.api.clone(),
                request: UpdateItemRequest::borrow(&item.id, &borrowed_time, user_id, &note),
            })
            .collect();

        match Saga::new(steps).run().await {
            SagaOutcome::Completed { completed } => {
                debug!(?completed, "All items updated");
            }
            SagaOutcome::Aborted(failure) => {
                warn!(
                    failed = %failure.failed_step,
                    error = %failure.error,
                    reverted = ?failure.compensated,
                    "Borrow rolled back"
                );
                if !failure.compensation_failures.is_empty() {
                    warn!(items = ?failure.compensation_failures, "Some items could not be reverted");
                }
                return Err(ApiError::borrow_failed(&[failure.failed_step]));
            }
        }

        let slot = {
            let mut ledger = self.ledger.lock().await;
            let slot = ledger.add_slot(items, slot_note, user_id).await?;
            ledger.set_selected_slot_id(None).await?;
            slot
        };

        let committed = || slot.items.iter().map(|i| i.id.as_str());
        self.catalog.mark(committed(), Availability::Borrowed, Some(user_id));
        self.scan.with_session_mut(|s| {
            for id in committed() {
                s.remove(id);
            }
        });

        info!(slot_id = %slot.id, "Borrow recorded");
        Ok(slot)
    }

    /// Returns the ticked items of the selected slot.
    ///
    /// Remote failures do not stop the local record: every ticked item is
    /// marked returned once all calls have finished.
    pub async fn commit_return(&self, user_id: &str) -> Result<ReturnReport, ApiError> {
        let _guard = self.busy.try_acquire().ok_or_else(ApiError::busy)?;

        let slot_id = {
            let ledger = self.ledger.lock().await;
            let id = ledger
                .ledger()
                .selected_slot_id()
                .ok_or(CoreError::NoSlotSelected)?
                .to_string();
            if ledger.ledger().slot(&id).is_none() {
                return Err(CoreError::SlotNotFound(id).into());
            }
            id
        };

        let (items, note) = self
            .returns
            .with_selection(|s| (s.items().to_vec(), s.note().to_string()));

        let returned_time = wire_timestamp(Utc::now());
        info!(slot_id = %slot_id, count = items.len(), "Committing return");

        let calls = items.iter().map(|item| {
            let request = ReturnItemRequest::new(&item.id, &returned_time, user_id, &note);
            let api = self.api.clone();
            async move {
                let result = api.return_item(&request).await;
                (request.item_id, result)
            }
        });

        let mut failed = Vec::new();
        for (item_id, result) in join_all(calls).await {
            if let Err(e) = result {
                warn!(item_id = %item_id, error = %e, "return-item failed");
                failed.push(item_id);
            }
        }

        {
            let mut ledger = self.ledger.lock().await;
            ledger.return_items(&slot_id, &items).await?;
            if let Some((returned, total)) = ledger.ledger().slot(&slot_id).map(|s| s.progress()) {
                info!(slot_id = %slot_id, returned, total, "Return recorded");
            }
            ledger.set_selected_slot_id(None).await?;
        }
        self.catalog
            .mark(items.iter().map(|i| i.id.as_str()), Availability::Available, None);
        self.returns.with_selection_mut(|s| s.reset());

        Ok(ReturnReport {
            slot_id,
            returned: items.into_iter().map(|i| i.id).collect(),
            failed,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppState;
    use crate::testing::{catalog, scan_all, state_with, Call, FakeApi};
    use lolidesi_core::ScannedItem;

    #[tokio::test]
    async fn test_empty_scan_makes_no_calls() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;

        let err = state.coordinator().commit_borrow("EMP01").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "No items scanned!");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_borrow_success_records_one_slot() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2", "A-3"]);
        state.scan().with_session_mut(|s| s.set_note("  site B  "));

        let slot = state.coordinator().commit_borrow("EMP01").await.unwrap();

        let ids: Vec<_> = slot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["A-1", "A-2", "A-3"]);
        assert!(slot.returned.is_empty());
        assert_eq!(slot.note.as_deref(), Some("site B"));
        assert_eq!(slot.user_id, "EMP01");

        assert_eq!(
            api.calls(),
            vec![Call::Borrow("A-1".into()), Call::Borrow("A-2".into()), Call::Borrow("A-3".into())]
        );

        let ledger = state.ledger().snapshot().await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.selected_slot_id(), None);
        assert!(state.scan().with_session(|s| s.is_empty()));
    }

    #[tokio::test]
    async fn test_scan_during_borrow_is_kept() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2"]);

        let scan = state.scan().clone();
        api.on_update(move || {
            scan.with_session_mut(|s| {
                let _ = s.scan("A-4", &catalog());
            });
        });

        let slot = state.coordinator().commit_borrow("EMP01").await.unwrap();
        assert_eq!(slot.items.len(), 2);
        assert_eq!(
            state.scan().with_session(|s| s.items().to_vec()),
            vec![ScannedItem::new("A-4", "Item A-4")]
        );
    }

    #[tokio::test]
    async fn test_borrow_marks_cached_catalog() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2"]);

        state.coordinator().commit_borrow("EMP01").await.unwrap();

        state.catalog().with_items(|items| {
            let a1 = items.iter().find(|i| i.id == "A-1").unwrap();
            assert_eq!(a1.availability, Availability::Borrowed);
            assert_eq!(a1.borrowed_by.as_deref(), Some("EMP01"));
            assert!(items.iter().find(|i| i.id == "A-3").unwrap().is_available());
        });
    }

    #[tokio::test]
    async fn test_failed_borrow_leaves_catalog_available() {
        let api = FakeApi::failing_updates(&["A-2"]);
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2"]);

        state.coordinator().commit_borrow("EMP01").await.unwrap_err();
        assert!(state
            .catalog()
            .with_items(|items| items.iter().filter(|i| i.id.starts_with("A-")).all(|i| i.is_available())));
    }

    #[tokio::test]
    async fn test_borrow_requests_share_timestamp_and_user() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2"]);
        state.scan().with_session_mut(|s| s.set_note(" x "));

        state.coordinator().commit_borrow("EMP01").await.unwrap();

        let requests = api.update_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].borrowed_time, requests[1].borrowed_time);
        assert!(requests[0].borrowed_time.ends_with('Z'));
        assert!(requests.iter().all(|r| r.by == "EMP01" && r.note == "x" && r.status_availability == 0));
    }

    #[tokio::test]
    async fn test_borrow_failure_reverts_earlier_items() {
        let api = FakeApi::failing_updates(&["A-3"]);
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2", "A-3", "A-4"]);

        let err = state.coordinator().commit_borrow("EMP01").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BorrowFailed);
        assert!(err.message.contains("A-3"));
        assert!(!err.message.contains("A-4"));

        assert_eq!(
            api.calls(),
            vec![
                Call::Borrow("A-1".into()),
                Call::Borrow("A-2".into()),
                Call::Borrow("A-3".into()),
                Call::Release("A-2".into()),
                Call::Release("A-1".into()),
            ]
        );

        assert!(state.ledger().snapshot().await.is_empty());
        assert_eq!(state.scan().with_session(|s| s.len()), 4);
    }

    #[tokio::test]
    async fn test_release_body_is_blank() {
        let api = FakeApi::failing_updates(&["A-2"]);
        let state = state_with(api.clone()).await;
        scan_all(&state, &["A-1", "A-2"]);

        state.coordinator().commit_borrow("EMP01").await.unwrap_err();

        let release = api.update_requests().pop().unwrap();
        assert_eq!(release, UpdateItemRequest::release("A-1"));
    }

    async fn state_with_slot(api: Arc<FakeApi>) -> (AppState, String) {
        let state = state_with(api).await;
        let slot = state
            .ledger()
            .lock()
            .await
            .add_slot(
                vec![
                    ScannedItem::new("A", "a"),
                    ScannedItem::new("B", "b"),
                    ScannedItem::new("C", "c"),
                ],
                None,
                "EMP01",
            )
            .await
            .unwrap();
        state
            .ledger()
            .lock()
            .await
            .set_selected_slot_id(Some(slot.id.clone()))
            .await
            .unwrap();
        (state, slot.id)
    }

    #[tokio::test]
    async fn test_return_records_selection_and_clears() {
        let api = FakeApi::new();
        let (state, slot_id) = state_with_slot(api.clone()).await;
        state.returns().with_selection_mut(|s| {
            s.toggle(&ScannedItem::new("A", "a"));
            s.toggle(&ScannedItem::new("C", "c"));
            s.set_note("back");
        });

        let report = state.coordinator().commit_return("EMP01").await.unwrap();
        assert_eq!(report.returned, vec!["A", "C"]);
        assert!(report.failed.is_empty());

        let ledger = state.ledger().snapshot().await;
        let slot = ledger.slot(&slot_id).unwrap();
        assert_eq!(slot.returned, vec![ScannedItem::new("A", "a"), ScannedItem::new("C", "c")]);
        assert_eq!(ledger.selected_slot_id(), None);
        assert!(state.returns().with_selection(|s| s.is_empty() && s.note().is_empty()));

        let mut calls = api.calls();
        calls.sort();
        assert_eq!(calls, vec![Call::Return("A".into()), Call::Return("C".into())]);

        let requests = api.return_requests();
        assert_eq!(requests[0].returned_time, requests[1].returned_time);
        assert!(requests.iter().all(|r| r.returned_by == "EMP01" && r.note == "back" && r.status_availability == 1));
    }

    #[tokio::test]
    async fn test_return_failure_still_recorded() {
        let api = FakeApi::failing_returns(&["B"]);
        let (state, slot_id) = state_with_slot(api.clone()).await;
        state.returns().with_selection_mut(|s| s.toggle(&ScannedItem::new("B", "b")));

        let report = state.coordinator().commit_return("EMP01").await.unwrap();
        assert_eq!(report.failed, vec!["B"]);

        let ledger = state.ledger().snapshot().await;
        assert!(ledger.slot(&slot_id).unwrap().is_returned("B"));
    }

    #[tokio::test]
    async fn test_return_requires_selected_slot() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;

        let err = state.coordinator().commit_return("EMP01").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_second_commit_rejected_while_busy() {
        let api = FakeApi::new();
        let busy = BusyFlag::new();
        let state = state_with(api.clone()).await;
        let coordinator = BorrowCoordinator::new(
            api.clone(),
            state.ledger().clone(),
            state.scan().clone(),
            state.returns().clone(),
            state.catalog().clone(),
            busy.clone(),
        );
        scan_all(&state, &["A-1"]);

        let _held = busy.try_acquire().unwrap();
        assert_eq!(coordinator.commit_borrow("EMP01").await.unwrap_err().code, ErrorCode::Busy);
        assert_eq!(coordinator.commit_return("EMP01").await.unwrap_err().code, ErrorCode::Busy);
        assert!(api.calls().is_empty());
        assert!(coordinator.is_busy());
    }
}
