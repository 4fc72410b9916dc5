//! Backend contract for grid storage.
//!
//! The trait is the only suspension point in the system: everything above it
//! is synchronous translation logic, everything behind it is network I/O
//! owned by the implementation (including retries, if any).

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::Credential;
use crate::error::Result;
use crate::grid::Grid;
use crate::types::SheetMeta;

/// A rectangular region of one sheet, rendered to A1 notation on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Every populated cell in the sheet.
    Full,
    /// The header row only (grid row 1).
    Header,
    /// One absolute grid row.
    Row(u32),
}

impl RangeSpec {
    /// Renders the range in A1 notation against a sheet title.
    #[must_use]
    pub fn to_a1(self, sheet_title: &str) -> String {
        let title = quote_title(sheet_title);
        match self {
            Self::Full => title,
            Self::Header => format!("{title}!1:1"),
            Self::Row(row) => format!("{title}!{row}:{row}"),
        }
    }
}

/// Single-quotes a sheet title for A1 notation, doubling embedded quotes.
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Storage backend holding the spreadsheet grids.
///
/// Implementations perform exactly one backend read or write per call and
/// surface failures as backend errors; they never reinterpret grid content.
#[async_trait]
pub trait GridBackend: Send + Sync {
    /// Resolves a sheet reference (numeric id, tab index or title) to
    /// metadata for the addressed sheet.
    async fn sheet_meta(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
    ) -> Result<SheetMeta>;

    /// Reads one rectangular range of the sheet.
    async fn read_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
    ) -> Result<Grid>;

    /// Overwrites one rectangular range of the sheet.
    async fn write_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
        grid: Grid,
    ) -> Result<()>;

    /// Appends one row after the last populated row and returns its
    /// assigned absolute row index.
    async fn append_row(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        row: Vec<String>,
    ) -> Result<u32>;
}

#[async_trait]
impl<T: GridBackend + ?Sized> GridBackend for Arc<T> {
    async fn sheet_meta(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
    ) -> Result<SheetMeta> {
        (**self).sheet_meta(credential, document_id, sheet_ref).await
    }

    async fn read_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
    ) -> Result<Grid> {
        (**self)
            .read_range(credential, document_id, sheet, range)
            .await
    }

    async fn write_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
        grid: Grid,
    ) -> Result<()> {
        (**self)
            .write_range(credential, document_id, sheet, range, grid)
            .await
    }

    async fn append_row(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        row: Vec<String>,
    ) -> Result<u32> {
        (**self).append_row(credential, document_id, sheet, row).await
    }
}
