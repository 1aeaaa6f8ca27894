//! # lolidesi-core: Pure Business Logic for LoLiDesi
//!
//! This crate holds the borrow/return logic of the LoLiDesi item scanner as
//! pure data structures and functions. Storage and network access live in
//! `lolidesi-store` and `lolidesi-remote`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LoLiDesi Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (camera, lists)                    │   │
//! │  │    Scan QR ──► Borrow ──► Return ──► Availability / History     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              apps/scanner (coordinator, state)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lolidesi-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  ledger  │  │   saga   │  │  table   │  │ scan/catalog │   │   │
//! │  │   │  Slots   │  │ Forward/ │  │ Header + │  │ Working set, │   │   │
//! │  │   │ Returns  │  │ Undo     │  │ rows     │  │ views        │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ScannedItem, BorrowSlot, CatalogItem, ...)
//! - [`ledger`] - The borrow ledger: slots and their return progress
//! - [`saga`] - Forward/compensating step runner
//! - [`table`] - Typed decoder for the spreadsheet header+rows payloads
//! - [`scan`] - Scanned-item working set and return selection
//! - [`catalog`] - Availability and history views
//! - [`validation`] - Input normalisation and checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use lolidesi_core::{BorrowLedger, ScannedItem};
//!
//! let mut ledger = BorrowLedger::default();
//! let slot_id = ledger
//!     .add_slot(vec![ScannedItem::new("A-1", "Drill")], None, "EMP01")
//!     .id
//!     .clone();
//!
//! ledger.return_items(&slot_id, &[ScannedItem::new("A-1", "Drill")]);
//! assert!(ledger.slot(&slot_id).unwrap().is_fully_returned());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod saga;
pub mod scan;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, DecodeError, ValidationError};
pub use ledger::BorrowLedger;
pub use saga::{Saga, SagaFailure, SagaOutcome, SagaStep};
pub use scan::{ReturnSelection, ScanSession};
pub use table::{FromTable, Table};
pub use types::*;
