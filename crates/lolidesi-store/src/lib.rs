//! # lolidesi-store: Local Persistence for LoLiDesi
//!
//! SQLite-backed storage for the scanner: the borrow ledger and the login
//! session, both kept as string values in a single key-value table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LoLiDesi Data Flow                               │
//! │                                                                         │
//! │  BorrowCoordinator (apps/scanner)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  lolidesi-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ KeyValueStore │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ LedgerStore   │    │ 001_kv_store │   │   │
//! │  │   │               │    │ SessionStore  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <app data dir>/lolidesi.db                                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lolidesi_store::{Database, DbConfig, LedgerStore};
//!
//! let db = Database::new(DbConfig::new("lolidesi.db")).await?;
//! let mut ledger = LedgerStore::open(&db).await?;
//! ledger.add_slot(items, None, "EMP01").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueStore;
pub use repository::ledger::{LedgerStore, LEDGER_KEY};
pub use repository::session::SessionStore;
