//! # lolidesi-remote: Inventory Backend Client
//!
//! HTTP access to the spreadsheet-backed inventory service.
//!
//! ## Modules
//!
//! - [`api`] - `InventoryApi` trait and endpoint names
//! - [`client`] - `reqwest` implementation
//! - [`wire`] - Request/response bodies in the service's field naming
//! - [`config`] - Base URL, timeout and storage location
//! - [`error`] - Remote error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lolidesi_remote::{HttpInventoryApi, InventoryApi, RemoteConfig};
//!
//! let config = RemoteConfig::load(None)?;
//! let api = HttpInventoryApi::new(&config.remote)?;
//! let items = api.read_items().await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use api::{Endpoint, InventoryApi};
pub use client::HttpInventoryApi;
pub use config::{RemoteConfig, RemoteSettings, StorageSettings};
pub use error::{RemoteError, RemoteResult};
pub use wire::{wire_timestamp, LoginRequest, LoginResponse, ReturnItemRequest, UpdateItemRequest};
