//! # Inventory API
//!
//! The operations the scanner needs from the backend, as a trait so the
//! coordinator can be driven by an in-memory fake in tests.

use async_trait::async_trait;
use lolidesi_core::{CatalogItem, CurrentUser, EmployeeDirectory, HistoryEntry};

use crate::error::RemoteResult;
use crate::wire::{LoginRequest, ReturnItemRequest, UpdateItemRequest};

/// Endpoint names relative to the service root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ReadItemList,
    ReadUsers,
    ReadHistory,
    UpdateItem,
    ReturnItem,
    Login,
}

impl Endpoint {
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::ReadItemList => "read-item-list",
            Endpoint::ReadUsers => "read-users",
            Endpoint::ReadHistory => "read-history",
            Endpoint::UpdateItem => "update-item",
            Endpoint::ReturnItem => "return-item",
            Endpoint::Login => "login",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// `GET read-item-list`
    async fn read_items(&self) -> RemoteResult<Vec<CatalogItem>>;

    /// `GET read-users`
    async fn read_users(&self) -> RemoteResult<EmployeeDirectory>;

    /// `GET read-history`, in sheet order.
    async fn read_history(&self) -> RemoteResult<Vec<HistoryEntry>>;

    /// `POST update-item`. Any non-success status is an error.
    async fn update_item(&self, request: &UpdateItemRequest) -> RemoteResult<()>;

    /// `POST return-item`. Any non-success status is an error.
    async fn return_item(&self, request: &ReturnItemRequest) -> RemoteResult<()>;

    /// `POST login`. A refused login is `RemoteError::InvalidCredentials`.
    async fn login(&self, request: &LoginRequest) -> RemoteResult<CurrentUser>;
}
