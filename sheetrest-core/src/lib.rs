//! # sheetrest core
//!
//! The translation layer between spreadsheet grids and keyed row records.
//!
//! A sheet whose first row names its columns becomes a table: this crate
//! extracts that header, decodes and encodes rows against it, projects
//! filtered and paginated views, selects the request credential, and defines
//! the backend contract the async shell implements. Everything here is
//! synchronous and deterministic; network I/O lives behind
//! [`traits::GridBackend`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

/// Credential selection for backend requests
pub mod auth;

/// Positional codec between grid rows and keyed records
pub mod codec;

/// Runtime configuration
pub mod config;

/// Error types for sheet translation and row operations
pub mod error;

/// Grid model and header extraction
pub mod grid;

/// Backend contract for grid storage
pub mod traits;

/// Shared data types for the row resource
pub mod types;

/// Filtered, paginated projection of data rows
pub mod view;

// Re-export commonly used types
pub use auth::{Credential, resolve_credential};
pub use config::SheetRestConfig;
pub use error::{Result, SheetRestError};
pub use grid::{Grid, Header, split_header};
pub use traits::{GridBackend, RangeSpec};
pub use types::{
    BulkItemOutcome, BulkReport, CellValue, Page, Record, RowHandle, SheetInfo, SheetMeta,
};
pub use view::{FIRST_DATA_ROW, RowFilter, row_at, select_rows};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::*;
    pub use crate::codec::*;
    pub use crate::config::SheetRestConfig;
    pub use crate::error::{Result, SheetRestError};
    pub use crate::grid::*;
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use crate::view::*;
}
