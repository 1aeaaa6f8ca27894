//! # API Error Type
//!
//! Unified error type for scanner commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in LoLiDesi                               │
//! │                                                                         │
//! │  Shell                       Rust Core                                  │
//! │  ─────                       ─────────                                  │
//! │                                                                         │
//! │  commands::borrow::commit(&state)                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  CoreError ──────┐                                               │  │
//! │  │  StoreError ─────┼──► ApiError { code, message } ───────────────►│  │
//! │  │  RemoteError ────┘    (detail logged, message kept short)        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Alert.alert(err.message)                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lolidesi_core::{CoreError, ValidationError};
use lolidesi_remote::RemoteError;
use lolidesi_store::StoreError;
use serde::Serialize;

/// Error returned from scanner commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "BORROW_FAILED",
///   "message": "Failed to update item(s): A-3. All changes have been reverted."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown item or slot
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Scan rejected by a business rule (borrowed, duplicate)
    BusinessLogic,

    /// Borrow saga aborted and was rolled back
    BorrowFailed,

    /// Another commit is still running
    Busy,

    /// No user is logged in
    NotLoggedIn,

    /// Login refused
    InvalidCredentials,

    /// Server unreachable or rejected the request
    NetworkError,

    /// Server answered with an unexpected shape
    InvalidResponse,

    /// Local database failed
    DatabaseError,

    /// Bad configuration
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn busy() -> Self {
        ApiError::new(ErrorCode::Busy, "Another request is still in progress")
    }

    pub fn not_logged_in() -> Self {
        ApiError::new(ErrorCode::NotLoggedIn, "Please log in first")
    }

    /// Borrow rolled back after `failed` item ids could not be updated.
    pub fn borrow_failed(failed: &[String]) -> Self {
        ApiError::new(
            ErrorCode::BorrowFailed,
            format!(
                "Failed to update item(s): {}. All changes have been reverted.",
                failed.join(", ")
            ),
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoItemsScanned => ApiError::validation("No items scanned!"),
            CoreError::ItemNotFound(_) | CoreError::SlotNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::ItemUnavailable { .. } | CoreError::AlreadyScanned { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::NoSlotSelected => ApiError::validation(err.to_string()),
            CoreError::Decode(e) => {
                tracing::error!("Decode failed: {}", e);
                ApiError::new(ErrorCode::InvalidResponse, "Unexpected response from server")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            StoreError::Corrupt { key, reason } => {
                tracing::error!(key = %key, "Stored value is corrupt: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, "Saved data could not be read")
            }
            other => {
                tracing::error!("Local storage failed: {}", other);
                ApiError::new(ErrorCode::DatabaseError, "Could not save data on this device")
            }
        }
    }
}

/// Converts remote errors to API errors.
impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        if err.is_config_error() {
            return ApiError::new(ErrorCode::ConfigError, err.to_string());
        }

        match err {
            RemoteError::InvalidCredentials => {
                ApiError::new(ErrorCode::InvalidCredentials, "Invalid name or password")
            }
            RemoteError::ConnectionFailed(e) => {
                tracing::warn!("Connection failed: {}", e);
                ApiError::new(ErrorCode::NetworkError, "Could not connect to server")
            }
            RemoteError::Timeout => ApiError::new(ErrorCode::NetworkError, "Server did not respond"),
            RemoteError::Status { endpoint, status } => {
                tracing::warn!(endpoint = %endpoint, status, "Server rejected request");
                ApiError::new(ErrorCode::NetworkError, "Server rejected the request")
            }
            RemoteError::Decode(e) => {
                tracing::error!("Decode failed: {}", e);
                ApiError::new(ErrorCode::InvalidResponse, "Unexpected response from server")
            }
            RemoteError::DeserializationFailed(e) => {
                tracing::error!("Response body unreadable: {}", e);
                ApiError::new(ErrorCode::InvalidResponse, "Unexpected response from server")
            }
            other => {
                tracing::error!("Remote call failed: {}", other);
                ApiError::internal("Request could not be sent")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
