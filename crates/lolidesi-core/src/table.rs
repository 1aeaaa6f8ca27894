//! # Spreadsheet Table Decoder
//!
//! The backend's read endpoints return a sheet dump rather than typed JSON:
//!
//! ```json
//! [
//!   ["itemID", "itemName", "statusAvailability", "borrowedBy"],
//!   ["A-1",    "Drill",    1,                    ""],
//!   ["A-2",    "Ladder",   "0",                  "EMP07"]
//! ]
//! ```
//!
//! [`Table`] validates that shape once, and [`FromTable`] implementations
//! resolve their columns by header name before decoding any row, so a
//! renamed column fails the whole read with a message naming the column.
//!
//! ## Cell Rules
//! - strings are taken as-is, numbers and booleans are stringified
//! - `null` and cells past the end of a short row read as `""`
//! - integer columns accept numbers or strings with a leading integer
//!   (`"1"`, `" 0 "`, `"1.0"`)

use serde_json::Value;

use crate::error::DecodeError;
use crate::types::{Availability, CatalogItem, Employee, HistoryEntry, HistoryStatus};

// =============================================================================
// Table
// =============================================================================

/// A decoded header row plus value rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Validates the raw payload of the endpoint `name`.
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self, DecodeError> {
        let name = name.into();

        let Value::Array(outer) = value else {
            return Err(DecodeError::NotATable {
                table: name,
                reason: "expected an array of rows".into(),
            });
        };

        let mut rows = Vec::with_capacity(outer.len().saturating_sub(1));
        let mut iter = outer.into_iter();

        let headers = match iter.next() {
            Some(Value::Array(cells)) => cells.iter().map(cell_text).collect(),
            Some(_) => {
                return Err(DecodeError::NotATable {
                    table: name,
                    reason: "header row is not an array".into(),
                })
            }
            None => return Err(DecodeError::MissingHeader { table: name }),
        };

        for (index, row) in iter.enumerate() {
            match row {
                Value::Array(cells) => rows.push(cells),
                _ => {
                    return Err(DecodeError::NotATable {
                        table: name,
                        reason: format!("row {} is not an array", index + 1),
                    })
                }
            }
        }

        Ok(Table {
            name,
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a required column.
    pub fn column(&self, header: &str) -> Result<usize, DecodeError> {
        self.optional_column(header)
            .ok_or_else(|| DecodeError::MissingColumn {
                table: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Index of a column that may be absent.
    pub fn optional_column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == header)
    }

    /// Iterates rows with their 1-based data row number.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(i, cells)| Row {
            table: &self.name,
            number: i + 1,
            cells,
        })
    }

    /// Decodes every row as `T`.
    pub fn decode<T: FromTable>(&self) -> Result<Vec<T>, DecodeError> {
        let columns = T::columns(self)?;
        self.rows().map(|row| T::from_row(&row, &columns)).collect()
    }
}

// =============================================================================
// Row
// =============================================================================

/// A borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a str,
    number: usize,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    /// Cell as text; missing cells read as `""`.
    pub fn text(&self, column: usize) -> String {
        self.cells.get(column).map(cell_text).unwrap_or_default()
    }

    /// Cell as text, `None` when blank or the column is absent.
    pub fn optional_text(&self, column: Option<usize>) -> Option<String> {
        column
            .map(|c| self.text(c))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Cell parsed as a leading integer.
    pub fn integer(&self, column: usize, header: &str) -> Result<i64, DecodeError> {
        let parsed = match self.cells.get(column) {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => leading_integer(s),
            _ => None,
        };

        parsed.ok_or_else(|| self.invalid(header, format!("expected an integer, got '{}'", self.text(column))))
    }

    /// Builds an `InvalidCell` error for this row.
    pub fn invalid(&self, header: &str, reason: impl Into<String>) -> DecodeError {
        DecodeError::InvalidCell {
            table: self.table.to_string(),
            row: self.number,
            column: header.to_string(),
            reason: reason.into(),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Parses an optional sign followed by digits, ignoring anything after.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

// =============================================================================
// Row Schemas
// =============================================================================

/// A type decodable from a [`Table`].
pub trait FromTable: Sized {
    /// Resolved column indices.
    type Columns;

    /// Resolves columns against the header row, failing on missing ones.
    fn columns(table: &Table) -> Result<Self::Columns, DecodeError>;

    /// Decodes one row.
    fn from_row(row: &Row<'_>, columns: &Self::Columns) -> Result<Self, DecodeError>;
}

/// Column indices for `read-item-list`.
pub struct ItemColumns {
    id: usize,
    name: usize,
    status: usize,
    borrowed_by: Option<usize>,
}

impl FromTable for CatalogItem {
    type Columns = ItemColumns;

    fn columns(table: &Table) -> Result<ItemColumns, DecodeError> {
        Ok(ItemColumns {
            id: table.column("itemID")?,
            name: table.column("itemName")?,
            status: table.column("statusAvailability")?,
            borrowed_by: table.optional_column("borrowedBy"),
        })
    }

    fn from_row(row: &Row<'_>, c: &ItemColumns) -> Result<Self, DecodeError> {
        let code = row.integer(c.status, "statusAvailability")?;
        let availability = Availability::from_code(code).ok_or_else(|| {
            row.invalid("statusAvailability", format!("unknown availability code {}", code))
        })?;

        Ok(CatalogItem {
            id: row.text(c.id),
            name: row.text(c.name),
            availability,
            borrowed_by: row.optional_text(c.borrowed_by),
        })
    }
}

/// Column indices for `read-users`.
pub struct EmployeeColumns {
    id: usize,
    name: usize,
}

impl FromTable for Employee {
    type Columns = EmployeeColumns;

    fn columns(table: &Table) -> Result<EmployeeColumns, DecodeError> {
        Ok(EmployeeColumns {
            id: table.column("emp_ID")?,
            name: table.column("emp_name")?,
        })
    }

    fn from_row(row: &Row<'_>, c: &EmployeeColumns) -> Result<Self, DecodeError> {
        Ok(Employee {
            id: row.text(c.id),
            name: row.text(c.name),
        })
    }
}

/// Column indices for `read-history`.
pub struct HistoryColumns {
    log_id: usize,
    item_id: usize,
    status: usize,
    time: usize,
    by: Option<usize>,
    notes: Option<usize>,
}

impl FromTable for HistoryEntry {
    type Columns = HistoryColumns;

    fn columns(table: &Table) -> Result<HistoryColumns, DecodeError> {
        Ok(HistoryColumns {
            log_id: table.column("logID")?,
            item_id: table.column("itemID")?,
            status: table.column("status (borrow/return)")?,
            time: table.column("time")?,
            by: table.optional_column("by"),
            notes: table.optional_column("notes"),
        })
    }

    fn from_row(row: &Row<'_>, c: &HistoryColumns) -> Result<Self, DecodeError> {
        Ok(HistoryEntry {
            log_id: row.text(c.log_id),
            item_id: row.text(c.item_id),
            status: HistoryStatus::parse(&row.text(c.status)),
            time: row.text(c.time),
            by: row.optional_text(c.by),
            notes: row.optional_text(c.notes),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
