//! Grid model and header extraction.
//!
//! A sheet arrives from the backend as a rectangular block of string cells.
//! Row 1 names the columns; everything below it is data. The split is
//! recomputed on every request, so header edits in the spreadsheet take
//! effect immediately.

use std::collections::HashSet;

use crate::error::{Result, SheetRestError};

/// A rectangular block of string cells, row-major.
///
/// Rows may be ragged: backends right-trim trailing empty cells, so a data
/// row can be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid(Vec<Vec<String>>);

impl Grid {
    /// Wraps rows into a grid.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self(rows)
    }

    /// Borrowed view of the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Consumes the grid into its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.0
    }

    /// Whether the grid holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The ordered column names extracted from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Builds a header from raw header-row cells.
    ///
    /// Cells are trimmed and trailing blanks dropped. The result must be
    /// non-empty, free of interior blanks, and free of duplicates
    /// (case-sensitive, compared after trimming).
    ///
    /// # Errors
    /// Returns an invalid-header error describing the first violation.
    pub fn new(cells: Vec<String>) -> Result<Self> {
        let mut names: Vec<String> = cells
            .into_iter()
            .map(|cell| cell.trim().to_string())
            .collect();
        while names.last().is_some_and(|name| name.is_empty()) {
            names.pop();
        }
        if names.is_empty() {
            return Err(SheetRestError::invalid_header("header row is empty"));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(SheetRestError::invalid_header(format!(
                    "blank column name at position {}",
                    position + 1
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(SheetRestError::invalid_header(format!(
                    "duplicate column name {name:?}"
                )));
            }
        }

        Ok(Self { names })
    }

    /// The column names in grid order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header names no columns. Cannot occur for a validated
    /// header; present for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the header defines the given column.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    /// Position of the given column, if defined.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }
}

/// Splits a freshly read grid into its header and data rows.
///
/// # Errors
/// Returns an empty-sheet error for a grid with no rows at all, or an
/// invalid-header error when row 1 cannot serve as a header.
pub fn split_header(grid: Grid, sheet: &str) -> Result<(Header, Vec<Vec<String>>)> {
    let mut rows = grid.into_rows().into_iter();
    let first = rows
        .next()
        .ok_or_else(|| SheetRestError::empty_sheet(sheet))?;
    let header = Header::new(first)?;
    Ok((header, rows.collect()))
}
