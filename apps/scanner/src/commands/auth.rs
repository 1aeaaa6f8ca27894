//! # Auth Commands
//!
//! Login state lives in the key-value store under `isLoggedIn`, `empID` and
//! `empName`, so a restart keeps the user signed in.
//!
//! ```text
//! login(name, password)
//!      │
//!      ├── blank name / empty password ──► VALIDATION_ERROR (no request)
//!      │
//!      ▼
//! POST login ──► 2xx ──► save isLoggedIn/empID/empName ──► CurrentUser
//!      │
//!      ├── non-2xx ─────► INVALID_CREDENTIALS
//!      └── transport ───► NETWORK_ERROR
//! ```

use lolidesi_core::validation::validate_credentials;
use lolidesi_core::CurrentUser;
use lolidesi_remote::LoginRequest;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn login(state: &AppState, name: &str, password: &str) -> Result<CurrentUser, ApiError> {
    validate_credentials(name, password)?;
    debug!(name = %name, "login command");

    let request = LoginRequest {
        name: name.trim().to_string(),
        password: password.to_string(),
    };
    let user = state.api().login(&request).await?;

    state.db().session().save_login(&user).await?;
    info!(emp_id = %user.emp_id, "Logged in");
    Ok(user)
}

/// Forgets the user. The borrow ledger is kept.
pub async fn logout(state: &AppState) -> Result<(), ApiError> {
    state.db().session().clear().await?;
    info!("Logged out");
    Ok(())
}

pub async fn current_user(state: &AppState) -> Result<Option<CurrentUser>, ApiError> {
    Ok(state.db().session().current_user().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{state_with, Call, FakeApi};

    #[tokio::test]
    async fn test_login_persists_user() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;

        let user = login(&state, " alice ", "secret").await.unwrap();
        assert_eq!(user.emp_id, "EMP01");
        assert_eq!(current_user(&state).await.unwrap(), Some(user));
        assert!(state.db().session().is_logged_in().await.unwrap());
        assert_eq!(api.calls(), vec![Call::Login("alice".into())]);
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let state = state_with(FakeApi::new()).await;

        let err = login(&state, "alice", "wrong").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(current_user(&state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_name_sends_nothing() {
        let api = FakeApi::new();
        let state = state_with(api.clone()).await;

        let err = login(&state, "  ", "secret").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_offline() {
        let state = state_with(FakeApi::offline()).await;

        let err = login(&state, "alice", "secret").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let state = state_with(FakeApi::new()).await;
        login(&state, "alice", "secret").await.unwrap();

        logout(&state).await.unwrap();
        assert_eq!(current_user(&state).await.unwrap(), None);
        assert!(!state.db().session().is_logged_in().await.unwrap());
    }
}
