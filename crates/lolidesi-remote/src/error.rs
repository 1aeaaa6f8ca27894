//! # Remote Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Status                 │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  InvalidCredentials     │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Decode / Deserialize   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lolidesi_core::DecodeError;
use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid remote configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got a response (DNS, refused, TLS, reset).
    #[error("Could not connect to server: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// Server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Login was refused.
    #[error("Invalid name or password")]
    InvalidCredentials,

    /// Table payload did not match the expected columns.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

/// ## Error Mapping
/// ```text
/// timeout           → RemoteError::Timeout
/// body decode       → RemoteError::DeserializationFailed
/// builder (bad URL) → RemoteError::InvalidUrl
/// other             → RemoteError::ConnectionFailed
/// ```
impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout
        } else if err.is_decode() {
            RemoteError::DeserializationFailed(err.to_string())
        } else if err.is_builder() {
            RemoteError::InvalidUrl(err.to_string())
        } else {
            RemoteError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for RemoteError {
    fn from(err: std::io::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RemoteError {
    fn from(err: toml::de::Error) -> Self {
        RemoteError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RemoteError {
    fn from(err: toml::ser::Error) -> Self {
        RemoteError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl RemoteError {
    /// True for failures where sending the same request again could succeed.
    ///
    /// Nothing in this workspace retries automatically; callers use this for
    /// logging and for picking an error code.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::ConnectionFailed(_) | RemoteError::Timeout => true,
            RemoteError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RemoteError::InvalidConfig(_)
                | RemoteError::InvalidUrl(_)
                | RemoteError::ConfigLoadFailed(_)
                | RemoteError::ConfigSaveFailed(_)
        )
    }

    /// True if the server was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::ConnectionFailed(_) | RemoteError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(RemoteError::ConnectionFailed("reset".into()).is_retryable());
        assert!(RemoteError::Timeout.is_retryable());
        assert!(RemoteError::Status {
            endpoint: "update-item".into(),
            status: 503
        }
        .is_retryable());

        assert!(!RemoteError::Status {
            endpoint: "update-item".into(),
            status: 400
        }
        .is_retryable());
        assert!(!RemoteError::InvalidCredentials.is_retryable());
        assert!(!RemoteError::InvalidUrl("x".into()).is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(RemoteError::InvalidUrl("ftp://x".into()).is_config_error());
        assert!(!RemoteError::Timeout.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = RemoteError::Status {
            endpoint: "return-item".into(),
            status: 502,
        };
        assert_eq!(err.to_string(), "return-item returned HTTP 502");

        let err: RemoteError = DecodeError::MissingColumn {
            table: "read-users".into(),
            column: "emp_ID".into(),
        }
        .into();
        assert!(err.to_string().contains("emp_ID"));
    }
}
