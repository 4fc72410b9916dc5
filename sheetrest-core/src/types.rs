//! Shared data types for the row resource.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A decoded data row: column name to cell text, in header order.
pub type Record = IndexMap<String, String>;

/// A record together with its absolute grid position.
///
/// `row_id` is the 1-based grid row index; the header occupies row 1, so
/// data rows start at 2. The id reflects grid position even when the row was
/// selected through a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowHandle {
    /// Absolute 1-based grid row index.
    pub row_id: u32,
    /// The decoded record.
    pub record: Record,
}

/// Backend metadata for one sheet within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMeta {
    /// Numeric sheet id assigned by the backend.
    pub sheet_id: i64,
    /// Sheet title, used for range addressing.
    pub title: String,
    /// Zero-based tab position.
    pub index: u32,
    /// Total grid rows, including the header and trailing blanks.
    pub row_count: u32,
    /// Total grid columns.
    pub column_count: u32,
}

/// Response payload of the Info operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    /// Numeric sheet id assigned by the backend.
    pub sheet_id: i64,
    /// Sheet title.
    pub title: String,
    /// Zero-based tab position.
    pub index: u32,
    /// Column names from the header row.
    pub header: Vec<String>,
    /// Total grid rows, including the header.
    pub row_count: u32,
    /// Total grid columns.
    pub column_count: u32,
    /// Grid rows below the header.
    pub data_rows: u32,
}

/// Pagination window over the filtered row sequence.
///
/// A negative offset reads as 0; `limit` of zero or less selects no rows; an
/// absent limit selects all remaining rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip, counted after filtering.
    pub offset: i64,
    /// Maximum rows to return, `None` for all remaining.
    pub limit: Option<i64>,
}

impl Page {
    /// Creates a page window.
    #[must_use]
    pub fn new(offset: i64, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }
}

/// A JSON scalar crossing the API boundary.
///
/// Cells are plain strings inside the translation layer; this union exists
/// only to accept the scalar forms clients naturally send and pin down how
/// each coerces to cell text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// JSON null; encodes as the empty cell.
    Empty,
    /// JSON boolean; encodes as the sheet literals `TRUE` / `FALSE`.
    Bool(bool),
    /// JSON number; integers keep their exact digits, floats encode in
    /// their shortest decimal form.
    Number(serde_json::Number),
    /// JSON string; passed through unchanged.
    Text(String),
}

impl CellValue {
    /// Coerces the scalar to cell text.
    #[must_use]
    pub fn into_cell_text(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Number(number) => format_cell_number(&number),
            Self::Text(text) => text,
        }
    }
}

/// Renders a number the way a sheet displays it. Integers keep their exact
/// digits even past `f64` precision, and integral floats drop the
/// fractional part.
fn format_cell_number(number: &serde_json::Number) -> String {
    if let Some(integer) = number.as_i64() {
        return integer.to_string();
    }
    if let Some(integer) = number.as_u64() {
        return integer.to_string();
    }
    if let Some(float) = number.as_f64() {
        if float.is_finite() && float.fract() == 0.0 && float.abs() < 9.0e15 {
            #[allow(clippy::cast_possible_truncation)]
            return (float as i64).to_string();
        }
        return float.to_string();
    }
    number.to_string()
}

/// Outcome of one item within a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    /// Zero-based position of the item in the request body.
    pub index: usize,
    /// Target or assigned row id, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<u32>,
    /// Failure detail, present when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-item report of a bulk operation.
///
/// Bulk operations are best-effort: the call succeeds when the batch was
/// processed, and each item carries its own outcome. There is no rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Items that were written.
    pub succeeded: usize,
    /// Items that failed.
    pub failed: usize,
    /// One outcome per request item, in request order.
    pub items: Vec<BulkItemOutcome>,
}

impl BulkReport {
    /// Records a successful item.
    pub fn record_success(&mut self, index: usize, row_id: u32) {
        self.succeeded += 1;
        self.items.push(BulkItemOutcome {
            index,
            row_id: Some(row_id),
            error: None,
        });
    }

    /// Records a failed item.
    pub fn record_failure(&mut self, index: usize, error: impl Into<String>) {
        self.failed += 1;
        self.items.push(BulkItemOutcome {
            index,
            row_id: None,
            error: Some(error.into()),
        });
    }
}
