//! # Repository Layer
//!
//! Typed access to the `kv_store` table.
//!
//! ```text
//! KeyValueStore   raw string get/set/remove
//!   ├── LedgerStore   "borrow-storage" (JSON envelope, write-through)
//!   └── SessionStore  "isLoggedIn", "empID", "empName"
//! ```

pub mod kv;
pub mod ledger;
pub mod session;
