//! # Persisted Ledger
//!
//! [`LedgerStore`] wraps a [`BorrowLedger`] and saves it after every
//! mutation.
//!
//! ## Storage Format
//! ```text
//! kv_store["borrow-storage"] =
//!   {
//!     "state": {
//!       "slots": [ { "id", "items", "returned", "note"?, "userId" } ],
//!       "selectedSlotId": "..." | null
//!     },
//!     "version": 0
//!   }
//! ```
//!
//! ## Write-Through
//! ```text
//! mutate a copy ──► serialize ──► kv.set ──► swap copy in
//!                                   │
//!                                   └── Err: in-memory ledger unchanged
//! ```

use lolidesi_core::{BorrowLedger, BorrowSlot, ScannedItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::pool::Database;
use crate::repository::kv::KeyValueStore;

/// Storage key of the ledger snapshot.
pub const LEDGER_KEY: &str = "borrow-storage";

/// Envelope version written with every snapshot.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Deserialize)]
struct Snapshot {
    state: BorrowLedger,
    #[serde(default)]
    version: u32,
}

/// The borrow ledger, loaded once and written through on every change.
#[derive(Debug)]
pub struct LedgerStore {
    kv: KeyValueStore,
    ledger: BorrowLedger,
}

impl LedgerStore {
    /// Loads the ledger from `db`.
    pub async fn open(db: &Database) -> StoreResult<Self> {
        Self::load(db.kv()).await
    }

    /// Loads the ledger from the given key-value store.
    ///
    /// A missing key yields an empty ledger. A value that does not parse is
    /// an error rather than silently discarded history.
    pub async fn load(kv: KeyValueStore) -> StoreResult<Self> {
        let ledger = match kv.get(LEDGER_KEY).await? {
            None => {
                info!("No stored ledger, starting empty");
                BorrowLedger::new()
            }
            Some(raw) => {
                let snapshot: Snapshot =
                    serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(LEDGER_KEY, e))?;
                if snapshot.version != SNAPSHOT_VERSION {
                    warn!(version = snapshot.version, "Unexpected ledger snapshot version");
                }
                info!(slots = snapshot.state.len(), "Ledger loaded");
                snapshot.state
            }
        };

        Ok(LedgerStore { kv, ledger })
    }

    /// Current ledger state.
    pub fn ledger(&self) -> &BorrowLedger {
        &self.ledger
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> BorrowLedger {
        self.ledger.clone()
    }

    /// Appends a slot and persists. Returns the new slot.
    pub async fn add_slot(
        &mut self,
        items: Vec<ScannedItem>,
        note: Option<String>,
        user_id: impl Into<String>,
    ) -> StoreResult<BorrowSlot> {
        let mut next = self.ledger.clone();
        let slot = next.add_slot(items, note, user_id).clone();

        self.commit(next).await?;
        Ok(slot)
    }

    /// Records returned items against a slot and persists.
    ///
    /// Unknown slot ids are a no-op and nothing is written.
    pub async fn return_items(&mut self, slot_id: &str, items: &[ScannedItem]) -> StoreResult<bool> {
        let mut next = self.ledger.clone();
        if !next.return_items(slot_id, items) {
            debug!(slot_id = %slot_id, "return_items: unknown slot, ignoring");
            return Ok(false);
        }

        self.commit(next).await?;
        Ok(true)
    }

    /// Sets the slot open on the return screen and persists.
    pub async fn set_selected_slot_id(&mut self, id: Option<String>) -> StoreResult<()> {
        let mut next = self.ledger.clone();
        next.set_selected_slot_id(id);
        self.commit(next).await
    }

    /// Writes the current state again. Called at shutdown.
    pub async fn flush(&self) -> StoreResult<()> {
        self.write(&self.ledger).await
    }

    async fn commit(&mut self, next: BorrowLedger) -> StoreResult<()> {
        self.write(&next).await?;
        self.ledger = next;
        Ok(())
    }

    async fn write(&self, ledger: &BorrowLedger) -> StoreResult<()> {
        let raw = serde_json::to_string(&SnapshotRef {
            state: ledger,
            version: SNAPSHOT_VERSION,
        })?;

        self.kv.set(LEDGER_KEY, &raw).await.map_err(|e| {
            error!(error = %e, "Failed to persist ledger");
            e
        })
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: &'a BorrowLedger,
    version: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
