//! # Commands Module
//!
//! Everything the mobile shell invokes. Each command takes the shared
//! [`AppState`] plus its own arguments and returns a serialisable value or an
//! [`ApiError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, login guard)
//! ├── auth.rs     ◄─── Login, logout, current user
//! ├── catalog.rs  ◄─── Item list, availability, history, unreturned items
//! ├── scan.rs     ◄─── Borrow screen: scan, remove, note, commit
//! └── returns.rs  ◄─── Return screen: slots, ticks, note, commit
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell                                                                  │
//! │    await scan::scan_code(&state, "A-7")                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust                                                                   │
//! │    pub async fn scan_code(state: &AppState, code: &str)                 │
//! │        -> Result<Vec<ScannedItem>, ApiError>                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Shell renders the returned list, or shows `error.message`              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod catalog;
pub mod returns;
pub mod scan;

use lolidesi_core::CurrentUser;

use crate::error::ApiError;
use crate::state::AppState;

/// The logged-in user, or `NOT_LOGGED_IN`.
pub(crate) async fn require_user(state: &AppState) -> Result<CurrentUser, ApiError> {
    state
        .db()
        .session()
        .current_user()
        .await?
        .ok_or_else(ApiError::not_logged_in)
}
