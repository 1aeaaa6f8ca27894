//! # HTTP Client
//!
//! [`HttpInventoryApi`] implements [`InventoryApi`] with `reqwest`.
//!
//! ## Request Flow
//! ```text
//! read_items()
//!   │
//!   ├── GET {base}/read-item-list
//!   ├── non-2xx?            → RemoteError::Status
//!   ├── body → serde_json::Value
//!   ├── Table::from_value   → [[headers], [row], ...]
//!   └── table.decode::<CatalogItem>()
//! ```

use async_trait::async_trait;
use lolidesi_core::{CatalogItem, CurrentUser, Employee, EmployeeDirectory, HistoryEntry, Table};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::api::{Endpoint, InventoryApi};
use crate::config::RemoteSettings;
use crate::error::{RemoteError, RemoteResult};
use crate::wire::{LoginRequest, LoginResponse, ReturnItemRequest, UpdateItemRequest};

#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    http: Client,
    base: Url,
}

impl HttpInventoryApi {
    /// Builds a client from validated settings.
    pub fn new(settings: &RemoteSettings) -> RemoteResult<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(HttpInventoryApi {
            http: builder.build()?,
            base: normalize_base(&settings.base_url)?,
        })
    }

    /// Full URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> RemoteResult<Url> {
        Ok(self.base.join(endpoint.path())?)
    }

    async fn get_table(&self, endpoint: Endpoint) -> RemoteResult<Table> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%endpoint, "GET");

        let response = check_status(endpoint, self.http.get(url).send().await?)?;
        let body: Value = response.json().await?;

        Ok(Table::from_value(endpoint.path(), body)?)
    }

    async fn post<B: Serialize + Sync>(&self, endpoint: Endpoint, body: &B) -> RemoteResult<Response> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%endpoint, "POST");

        Ok(self.http.post(url).json(body).send().await?)
    }
}

/// Ensures the base ends in `/` so `join` appends instead of replacing the
/// last path segment.
fn normalize_base(raw: &str) -> RemoteResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn check_status(endpoint: Endpoint, response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(%endpoint, status = status.as_u16(), "Request rejected");
        Err(RemoteError::Status {
            endpoint: endpoint.path().to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn read_items(&self) -> RemoteResult<Vec<CatalogItem>> {
        let items = self.get_table(Endpoint::ReadItemList).await?.decode::<CatalogItem>()?;
        debug!(count = items.len(), "Items loaded");
        Ok(items)
    }

    async fn read_users(&self) -> RemoteResult<EmployeeDirectory> {
        let employees = self.get_table(Endpoint::ReadUsers).await?.decode::<Employee>()?;
        Ok(employees.into_iter().collect())
    }

    async fn read_history(&self) -> RemoteResult<Vec<HistoryEntry>> {
        Ok(self.get_table(Endpoint::ReadHistory).await?.decode::<HistoryEntry>()?)
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> RemoteResult<()> {
        let response = self.post(Endpoint::UpdateItem, request).await?;
        check_status(Endpoint::UpdateItem, response)?;
        Ok(())
    }

    async fn return_item(&self, request: &ReturnItemRequest) -> RemoteResult<()> {
        let response = self.post(Endpoint::ReturnItem, request).await?;
        check_status(Endpoint::ReturnItem, response)?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> RemoteResult<CurrentUser> {
        let response = self.post(Endpoint::Login, request).await?;
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "Login refused");
            return Err(RemoteError::InvalidCredentials);
        }

        let body: LoginResponse = response.json().await?;
        Ok(body.into())
    }
}
