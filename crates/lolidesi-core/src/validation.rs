//! # Validation Module
//!
//! Input checks that run before any remote call is made.

use crate::error::{CoreError, ValidationError};
use crate::types::ScannedItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Notes
// =============================================================================

/// Trims a free-text note, mapping blank input to `None`.
///
/// ## Example
/// ```rust
/// use lolidesi_core::validation::normalize_note;
///
/// assert_eq!(normalize_note("  urgent "), Some("urgent".to_string()));
/// assert_eq!(normalize_note("   "), None);
/// ```
pub fn normalize_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Borrow Preconditions
// =============================================================================

/// Rejects a borrow with nothing scanned.
pub fn validate_borrow_items(items: &[ScannedItem]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::NoItemsScanned);
    }
    Ok(())
}

// =============================================================================
// Credentials
// =============================================================================

/// Checks the login form before it is sent.
///
/// ## Rules
/// - name must not be blank
/// - password must not be empty (not trimmed: spaces may be significant)
pub fn validate_credentials(name: &str, password: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_note() {
        assert_eq!(normalize_note(""), None);
        assert_eq!(normalize_note("\n\t "), None);
        assert_eq!(normalize_note(" site B\n"), Some("site B".to_string()));
    }

    #[test]
    fn test_validate_borrow_items() {
        assert!(matches!(validate_borrow_items(&[]), Err(CoreError::NoItemsScanned)));
        assert!(validate_borrow_items(&[ScannedItem::new("A", "a")]).is_ok());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("Budi", "secret").is_ok());
        assert!(validate_credentials("  ", "secret").is_err());
        assert!(validate_credentials("Budi", "").is_err());
        assert!(validate_credentials("Budi", " ").is_ok());
    }
}
