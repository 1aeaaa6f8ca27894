//! # Wire Format
//!
//! Request and response bodies exactly as the inventory service expects
//! them. Field names follow the service (`itemID`, `statusAvailability`),
//! not Rust conventions.
//!
//! ## Bodies
//! ```text
//! update-item  (borrow)   { itemID, statusAvailability: 0, borrowedTime: <ts>, by: <emp>, note }
//! update-item  (release)  { itemID, statusAvailability: 1, borrowedTime: "",   by: "",    note: "" }
//! return-item             { itemID, statusAvailability: 1, returnedTime: <ts>, returnedBy: <emp>, note }
//! login                   { name, password }  →  { empID, empName }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use lolidesi_core::{Availability, CurrentUser};
use serde::{Deserialize, Deserializer, Serialize};

/// Formats a timestamp the way the service stores it: `2024-05-01T08:00:00.000Z`.
pub fn wire_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// update-item
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateItemRequest {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "statusAvailability")]
    pub status_availability: i64,
    #[serde(rename = "borrowedTime")]
    pub borrowed_time: String,
    pub by: String,
    pub note: String,
}

impl UpdateItemRequest {
    /// Marks an item borrowed. The note is sent trimmed.
    pub fn borrow(
        item_id: impl Into<String>,
        borrowed_time: impl Into<String>,
        by: impl Into<String>,
        note: &str,
    ) -> Self {
        UpdateItemRequest {
            item_id: item_id.into(),
            status_availability: Availability::Borrowed.code(),
            borrowed_time: borrowed_time.into(),
            by: by.into(),
            note: note.trim().to_string(),
        }
    }

    /// Puts an item back on the shelf with blank borrow fields.
    pub fn release(item_id: impl Into<String>) -> Self {
        UpdateItemRequest {
            item_id: item_id.into(),
            status_availability: Availability::Available.code(),
            borrowed_time: String::new(),
            by: String::new(),
            note: String::new(),
        }
    }
}

// =============================================================================
// return-item
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnItemRequest {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "statusAvailability")]
    pub status_availability: i64,
    #[serde(rename = "returnedTime")]
    pub returned_time: String,
    #[serde(rename = "returnedBy")]
    pub returned_by: String,
    pub note: String,
}

impl ReturnItemRequest {
    pub fn new(
        item_id: impl Into<String>,
        returned_time: impl Into<String>,
        returned_by: impl Into<String>,
        note: &str,
    ) -> Self {
        ReturnItemRequest {
            item_id: item_id.into(),
            status_availability: Availability::Available.code(),
            returned_time: returned_time.into(),
            returned_by: returned_by.into(),
            note: note.trim().to_string(),
        }
    }
}

// =============================================================================
// login
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "empID", deserialize_with = "string_or_number")]
    pub emp_id: String,
    #[serde(rename = "empName", default)]
    pub emp_name: String,
}

impl From<LoginResponse> for CurrentUser {
    fn from(resp: LoginResponse) -> Self {
        CurrentUser {
            emp_id: resp.emp_id,
            emp_name: resp.emp_name,
        }
    }
}

/// Sheet-backed ids arrive as either `"42"` or `42`.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_wire_timestamp_has_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(wire_timestamp(at), "2024-05-01T08:00:00.000Z");
    }

    #[test]
    fn test_borrow_body() {
        let body = UpdateItemRequest::borrow("A-1", "2024-05-01T08:00:00.000Z", "EMP07", "  site B ");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "itemID": "A-1",
                "statusAvailability": 0,
                "borrowedTime": "2024-05-01T08:00:00.000Z",
                "by": "EMP07",
                "note": "site B"
            })
        );
    }

    #[test]
    fn test_release_body_blanks_fields() {
        let body = UpdateItemRequest::release("A-1");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "itemID": "A-1",
                "statusAvailability": 1,
                "borrowedTime": "",
                "by": "",
                "note": ""
            })
        );
    }

    #[test]
    fn test_return_body() {
        let body = ReturnItemRequest::new("A-1", "t", "EMP07", "");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["statusAvailability"], 1);
        assert_eq!(value["returnedBy"], "EMP07");
        assert_eq!(value["note"], "");
    }

    #[test]
    fn test_login_response_numeric_id() {
        let resp: LoginResponse = serde_json::from_value(json!({"empID": 42, "empName": "Rina"})).unwrap();
        assert_eq!(CurrentUser::from(resp).emp_id, "42");

        let resp: LoginResponse = serde_json::from_value(json!({"empID": "EMP07"})).unwrap();
        assert_eq!(resp.emp_name, "");
    }
}
