//! # lolidesi-scanner: Application Layer
//!
//! The part of the LoLiDesi item scanner that the mobile shell talks to.
//!
//! ## Module Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanner Application                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Mobile shell (UI)                           │   │
//! │  └───────────────────────────┬─────────────────────────────────────┘   │
//! │                              │ commands::*                              │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │  commands/  auth │ catalog │ scan │ returns                     │   │
//! │  └──────┬────────────────────┬──────────────────────────┬──────────┘   │
//! │         │                    │                          │               │
//! │  ┌──────▼──────┐   ┌─────────▼──────────┐   ┌───────────▼──────────┐   │
//! │  │  AppState   │   │ BorrowCoordinator  │   │      ApiError        │   │
//! │  │ (state/)    │◄──│ saga + busy flag   │   │ { code, message }    │   │
//! │  └──────┬──────┘   └─────────┬──────────┘   └──────────────────────┘   │
//! │         │                    │                                          │
//! │    lolidesi-store      lolidesi-remote                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! lolidesi_scanner::init_tracing();
//! let config = RemoteConfig::load_or_default(None);
//! let state = AppState::open(&config).await?;
//! ```

pub mod commands;
pub mod coordinator;
pub mod error;
pub mod state;

#[cfg(test)]
mod testing;

pub use coordinator::{BorrowCoordinator, ReturnReport};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,lolidesi=debug,sqlx=warn";

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
