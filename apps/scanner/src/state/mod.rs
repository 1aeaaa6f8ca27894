//! # State Module
//!
//! Application state for the scanner, owned by the shell for the lifetime of
//! the app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  │  open(config) ──► Database ──► LedgerStore::open (load once)    │   │
//! │  │  shutdown()   ──► flush ledger ──► close pool                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┼──────────────┬──────────────┐            │
//! │     ▼              ▼         ▼              ▼              ▼            │
//! │  ┌────────┐  ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌─────────────┐    │
//! │  │Database│  │LedgerSt. │ │ScanState │ │ReturnState│ │CatalogState │    │
//! │  │(pool,  │  │Arc<async │ │Arc<Mutex<│ │Arc<Mutex< │ │Arc<RwLock<  │    │
//! │  │session)│  │ Mutex<>> │ │ Session>>│ │ Selection>│ │ Vec<Item>>> │    │
//! │  └────────┘  └──────────┘ └──────────┘ └───────────┘ └─────────────┘    │
//! │                    │            │             │                         │
//! │                    └────────────┴─────────────┘                         │
//! │                                 │                                       │
//! │                       BorrowCoordinator (+ BusyFlag)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod busy;
mod catalog;
mod ledger;
mod working;

pub use busy::{BusyFlag, BusyGuard};
pub use catalog::CatalogState;
pub use ledger::LedgerState;
pub use working::{ReturnState, ScanState};

use std::sync::Arc;

use lolidesi_remote::{HttpInventoryApi, InventoryApi, RemoteConfig};
use lolidesi_store::{Database, DbConfig, LedgerStore};
use tracing::{error, info};

use crate::coordinator::BorrowCoordinator;
use crate::error::{ApiError, ErrorCode};

pub struct AppState {
    db: Database,
    api: Arc<dyn InventoryApi>,
    ledger: LedgerState,
    scan: ScanState,
    returns: ReturnState,
    catalog: CatalogState,
    coordinator: BorrowCoordinator,
}

impl AppState {
    /// Opens the local database and builds the HTTP client from `config`.
    pub async fn open(config: &RemoteConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!(?parent, "Could not create data directory: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Could not create data directory")
            })?;
        }
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        let api = HttpInventoryApi::new(&config.remote)?;

        Self::from_parts(db, Arc::new(api)).await
    }

    /// Builds state around an existing database and API implementation.
    pub async fn from_parts(db: Database, api: Arc<dyn InventoryApi>) -> Result<Self, ApiError> {
        let ledger = LedgerState::new(LedgerStore::open(&db).await?);
        let scan = ScanState::new();
        let returns = ReturnState::new();
        let catalog = CatalogState::new();

        let coordinator = BorrowCoordinator::new(
            api.clone(),
            ledger.clone(),
            scan.clone(),
            returns.clone(),
            catalog.clone(),
            BusyFlag::new(),
        );

        info!("State initialized");
        Ok(AppState {
            db,
            api,
            ledger,
            scan,
            returns,
            catalog,
            coordinator,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn api(&self) -> &dyn InventoryApi {
        self.api.as_ref()
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    pub fn scan(&self) -> &ScanState {
        &self.scan
    }

    pub fn returns(&self) -> &ReturnState {
        &self.returns
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn coordinator(&self) -> &BorrowCoordinator {
        &self.coordinator
    }

    /// Writes the ledger one last time and closes the pool.
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        self.ledger.lock().await.flush().await?;
        self.db.close().await;
        info!("State shut down");
        Ok(())
    }
}
