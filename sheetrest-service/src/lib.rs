//! # sheetrest service
//!
//! The async shell around the translation core: a reqwest-backed Google
//! Sheets adapter, the row-operation orchestrator, the axum REST surface and
//! the CLI. All sheet semantics live in `sheetrest-core`; this crate wires
//! them to the network on both sides.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

/// Command-line entry point
pub mod cli;

/// Google Sheets v4 backend
pub mod google;

/// REST surface: router, state, server loop
pub mod http;

/// Row-level operations over one sheet
pub mod rows;

// Re-export commonly used types
pub use google::GoogleSheetsBackend;
pub use http::{ApiError, AppState, ErrorBody, router, serve};
pub use rows::RowService;
