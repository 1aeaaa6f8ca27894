//! # Error Types
//!
//! Domain-specific error types for lolidesi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lolidesi-core errors (this file)                                      │
//! │  ├── CoreError        - Scan / ledger / borrow rule violations         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── DecodeError      - Malformed spreadsheet payloads                 │
//! │                                                                         │
//! │  lolidesi-store   └── StoreError   - Local persistence failures        │
//! │  lolidesi-remote  └── RemoteError  - HTTP / backend failures           │
//! │  apps/scanner     └── ApiError     - What the UI shell sees            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        StoreError / RemoteError ────┴──► ApiError → UI alert           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A borrow was committed with an empty working set.
    #[error("No items scanned")]
    NoItemsScanned,

    /// Scanned code does not match any item in the catalog.
    #[error("No item matches ID: {0}")]
    ItemNotFound(String),

    /// Scanned item is currently borrowed by someone.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan QR "A-7"
    ///      │
    ///      ▼
    /// Catalog lookup: statusAvailability = 0
    ///      │
    ///      ▼
    /// ItemUnavailable { id: "A-7", name: "Ladder" }
    ///      │
    ///      ▼
    /// UI shows: "Ladder is already borrowed."
    /// ```
    #[error("{name} is already borrowed.")]
    ItemUnavailable { id: String, name: String },

    /// Scanned item is already in the working set.
    #[error("{name} has already been scanned.")]
    AlreadyScanned { id: String, name: String },

    /// A return was requested without a selected slot.
    #[error("No borrow slot selected")]
    NoSlotSelected,

    /// Selected slot id does not exist in the ledger.
    #[error("Borrow slot not found: {0}")]
    SlotNotFound(String),

    /// Remote payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Decode Error
// =============================================================================

/// Errors raised while decoding a header+rows spreadsheet payload.
///
/// Every variant names the table so the log line alone tells which
/// endpoint returned the unexpected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not an array of arrays.
    #[error("{table}: payload is not a table ({reason})")]
    NotATable { table: String, reason: String },

    /// Payload has no header row.
    #[error("{table}: missing header row")]
    MissingHeader { table: String },

    /// An expected column is absent from the header row.
    #[error("{table}: missing column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A cell could not be converted to the expected type.
    #[error("{table}: row {row}, column '{column}': {reason}")]
    InvalidCell {
        table: String,
        row: usize,
        column: String,
        reason: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemUnavailable {
            id: "A-7".to_string(),
            name: "Ladder".to_string(),
        };
        assert_eq!(err.to_string(), "Ladder is already borrowed.");

        let err = CoreError::ItemNotFound("ZZZ".to_string());
        assert_eq!(err.to_string(), "No item matches ID: ZZZ");
    }

    #[test]
    fn test_decode_error_names_table_and_column() {
        let err = DecodeError::MissingColumn {
            table: "read-item-list".to_string(),
            column: "itemID".to_string(),
        };
        assert_eq!(err.to_string(), "read-item-list: missing column 'itemID'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
