//! In-memory doubles shared by the command and coordinator tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lolidesi_core::{
    Availability, CatalogItem, CurrentUser, Employee, EmployeeDirectory, HistoryEntry, HistoryStatus,
};
use lolidesi_remote::{
    InventoryApi, LoginRequest, RemoteError, RemoteResult, ReturnItemRequest, UpdateItemRequest,
};
use lolidesi_store::{Database, DbConfig};

use crate::state::AppState;

type UpdateHook = Box<dyn Fn() + Send + Sync>;

/// A remote call as seen by the fake, in issue order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Call {
    Borrow(String),
    Release(String),
    Return(String),
    Login(String),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    updates: Mutex<Vec<UpdateItemRequest>>,
    returns: Mutex<Vec<ReturnItemRequest>>,
    failing_updates: HashSet<String>,
    failing_returns: HashSet<String>,
    offline: bool,
    on_update: Mutex<Option<UpdateHook>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeApi::default())
    }

    /// Borrowing any of `ids` fails. Releases always succeed.
    pub fn failing_updates(ids: &[&str]) -> Arc<Self> {
        Arc::new(FakeApi {
            failing_updates: ids.iter().map(|s| s.to_string()).collect(),
            ..FakeApi::default()
        })
    }

    pub fn failing_returns(ids: &[&str]) -> Arc<Self> {
        Arc::new(FakeApi {
            failing_returns: ids.iter().map(|s| s.to_string()).collect(),
            ..FakeApi::default()
        })
    }

    /// Every call fails with a connection error.
    pub fn offline() -> Arc<Self> {
        Arc::new(FakeApi {
            offline: true,
            ..FakeApi::default()
        })
    }

    /// Runs `hook` on every `update-item` call, before it is answered.
    pub fn on_update(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_update.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateItemRequest> {
        self.updates.lock().unwrap().clone()
    }

    pub fn return_requests(&self) -> Vec<ReturnItemRequest> {
        self.returns.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn reachable(&self) -> RemoteResult<()> {
        if self.offline {
            return Err(RemoteError::ConnectionFailed("connection refused".into()));
        }
        Ok(())
    }

    fn refused(endpoint: &str) -> RemoteError {
        RemoteError::Status {
            endpoint: endpoint.to_string(),
            status: 500,
        }
    }
}

#[async_trait]
impl InventoryApi for FakeApi {
    async fn read_items(&self) -> RemoteResult<Vec<CatalogItem>> {
        self.reachable()?;
        Ok(catalog())
    }

    async fn read_users(&self) -> RemoteResult<EmployeeDirectory> {
        self.reachable()?;
        Ok(vec![
            Employee {
                id: "EMP01".into(),
                name: "Alice".into(),
            },
            Employee {
                id: "EMP02".into(),
                name: "Budi".into(),
            },
        ]
        .into_iter()
        .collect())
    }

    async fn read_history(&self) -> RemoteResult<Vec<HistoryEntry>> {
        self.reachable()?;
        Ok(vec![
            history("1", "A-1", HistoryStatus::Borrow, "2024-03-01T08:00:00Z", Some("EMP01")),
            history("2", "A-1", HistoryStatus::Return, "2024-03-02T08:00:00Z", Some("EMP09")),
            history("3", "L-1", HistoryStatus::Borrow, "2024-03-03T08:00:00Z", None),
        ])
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> RemoteResult<()> {
        self.reachable()?;
        self.updates.lock().unwrap().push(request.clone());
        if let Some(hook) = self.on_update.lock().unwrap().as_ref() {
            hook();
        }

        let borrowing = request.status_availability == Availability::Borrowed.code();
        if borrowing {
            self.record(Call::Borrow(request.item_id.clone()));
            if self.failing_updates.contains(&request.item_id) {
                return Err(Self::refused("update-item"));
            }
        } else {
            self.record(Call::Release(request.item_id.clone()));
        }
        Ok(())
    }

    async fn return_item(&self, request: &ReturnItemRequest) -> RemoteResult<()> {
        self.reachable()?;
        self.returns.lock().unwrap().push(request.clone());
        self.record(Call::Return(request.item_id.clone()));

        if self.failing_returns.contains(&request.item_id) {
            return Err(Self::refused("return-item"));
        }
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> RemoteResult<CurrentUser> {
        self.reachable()?;
        self.record(Call::Login(request.name.clone()));

        if request.name == "alice" && request.password == "secret" {
            Ok(CurrentUser {
                emp_id: "EMP01".into(),
                emp_name: "Alice".into(),
            })
        } else {
            Err(RemoteError::InvalidCredentials)
        }
    }
}

/// Items A-1..A-4 are available; L-1 is out with EMP02.
pub fn catalog() -> Vec<CatalogItem> {
    let mut items: Vec<CatalogItem> = ["A-1", "A-2", "A-3", "A-4"]
        .iter()
        .map(|id| CatalogItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            availability: Availability::Available,
            borrowed_by: None,
        })
        .collect();
    items.push(CatalogItem {
        id: "L-1".into(),
        name: "Ladder".into(),
        availability: Availability::Borrowed,
        borrowed_by: Some("EMP02".into()),
    });
    items
}

fn history(
    log_id: &str,
    item_id: &str,
    status: HistoryStatus,
    time: &str,
    by: Option<&str>,
) -> HistoryEntry {
    HistoryEntry {
        log_id: log_id.into(),
        item_id: item_id.into(),
        status,
        time: time.into(),
        by: by.map(str::to_string),
        notes: None,
    }
}

/// Fresh state over an in-memory database.
pub async fn state_with(api: Arc<FakeApi>) -> AppState {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::from_parts(db, api).await.unwrap()
}

/// Loads the catalog fixture and scans `codes` in order.
pub fn scan_all(state: &AppState, codes: &[&str]) {
    state.catalog().replace(catalog());
    for code in codes {
        state
            .catalog()
            .with_items(|items| state.scan().with_session_mut(|s| s.scan(code, items).map(|_| ())))
            .unwrap();
    }
}
