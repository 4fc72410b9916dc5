//! Error types for sheet translation and row operations.

use thiserror::Error;

/// Result type alias for sheetrest operations.
pub type Result<T> = std::result::Result<T, SheetRestError>;

/// Comprehensive error type for sheetrest operations.
///
/// Every failure the service can surface maps to exactly one variant; the
/// [`kind`](SheetRestError::kind) discriminant is the stable string clients
/// see on the wire.
#[derive(Debug, Error)]
pub enum SheetRestError {
    /// The sheet holds no rows at all, so no header can be extracted.
    #[error("sheet {sheet:?} is empty: no header row to derive columns from")]
    EmptySheet {
        /// Sheet reference as the caller supplied it.
        sheet: String,
    },

    /// The first grid row cannot serve as a header.
    #[error("invalid header row: {message}")]
    InvalidHeader {
        /// What made the header unusable.
        message: String,
    },

    /// A filter referenced a column the header does not define.
    #[error("unknown column {column:?}")]
    UnknownColumn {
        /// The offending column name.
        column: String,
    },

    /// A row id pointed at the header row or beyond the data rows.
    #[error("row {row_id} not found")]
    RowNotFound {
        /// The requested absolute row index.
        row_id: i64,
    },

    /// No sheet in the document matched the given reference.
    #[error("sheet {sheet:?} not found in document")]
    SheetNotFound {
        /// Sheet reference as the caller supplied it.
        sheet: String,
    },

    /// Neither an access token nor a configured API key was available.
    #[error("no credential available: send an access token or configure a Google API key")]
    MissingCredential,

    /// A write was attempted with the read-only API-key credential.
    #[error("{operation} requires write access, but the API-key credential is read-only")]
    ReadOnlyCredential {
        /// The operation that was refused.
        operation: String,
    },

    /// A request parameter or body failed to parse.
    #[error("invalid parameter {parameter:?}: {message}")]
    InvalidParameter {
        /// Parameter or body-part name.
        parameter: String,
        /// Parse failure detail.
        message: String,
    },

    /// The service configuration is unusable.
    #[error("configuration error: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
    },

    /// I/O error, e.g. while binding the listener.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet backend rejected or failed a call.
    #[error("backend error: {message}")]
    Backend {
        /// Upstream failure detail.
        message: String,
        /// HTTP status reported by the backend, when there was one.
        status: Option<u16>,
    },
}

impl SheetRestError {
    /// Creates an empty-sheet error.
    #[must_use]
    pub fn empty_sheet(sheet: impl Into<String>) -> Self {
        Self::EmptySheet {
            sheet: sheet.into(),
        }
    }

    /// Creates an invalid-header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Creates an unknown-column error.
    #[must_use]
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates a row-not-found error.
    #[must_use]
    pub fn row_not_found(row_id: i64) -> Self {
        Self::RowNotFound { row_id }
    }

    /// Creates a sheet-not-found error.
    #[must_use]
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        Self::SheetNotFound {
            sheet: sheet.into(),
        }
    }

    /// Creates a read-only-credential error for the named operation.
    #[must_use]
    pub fn read_only(operation: impl Into<String>) -> Self {
        Self::ReadOnlyCredential {
            operation: operation.into(),
        }
    }

    /// Creates an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a backend error without an upstream status.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a backend error carrying the upstream HTTP status.
    #[must_use]
    pub fn backend_status(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Stable discriminant used as the `error` field of wire responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptySheet { .. } => "empty_sheet",
            Self::InvalidHeader { .. } => "invalid_header",
            Self::UnknownColumn { .. } => "unknown_column",
            Self::RowNotFound { .. } => "row_not_found",
            Self::SheetNotFound { .. } => "sheet_not_found",
            Self::MissingCredential => "missing_credential",
            Self::ReadOnlyCredential { .. } => "read_only_credential",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Config { .. } => "invalid_config",
            Self::Io(_) => "io_error",
            Self::Backend { .. } => "backend_error",
        }
    }
}

impl From<serde_json::Error> for SheetRestError {
    fn from(error: serde_json::Error) -> Self {
        Self::backend(format!("failed to decode backend response: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_constructors_build_expected_variants() {
        let error = SheetRestError::invalid_header("duplicate column name \"age\"");
        assert!(matches!(error, SheetRestError::InvalidHeader { .. }));

        let error = SheetRestError::row_not_found(1);
        assert!(matches!(error, SheetRestError::RowNotFound { row_id: 1 }));

        let error = SheetRestError::backend_status(429, "quota exceeded");
        match error {
            SheetRestError::Backend { status, .. } => assert_eq!(status, Some(429)),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn display_messages_are_descriptive() {
        let error = SheetRestError::unknown_column("city");
        assert_eq!(error.to_string(), "unknown column \"city\"");

        let error = SheetRestError::read_only("create row");
        assert_eq!(
            error.to_string(),
            "create row requires write access, but the API-key credential is read-only"
        );

        let error = SheetRestError::empty_sheet("People");
        assert!(error.to_string().contains("People"));
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(SheetRestError::MissingCredential.kind(), "missing_credential");
        assert_eq!(SheetRestError::row_not_found(0).kind(), "row_not_found");
        assert_eq!(SheetRestError::backend("boom").kind(), "backend_error");
        assert_eq!(SheetRestError::config("bad").kind(), "invalid_config");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let error: SheetRestError = io.into();
        assert_eq!(error.kind(), "io_error");
    }

    #[test]
    fn serde_errors_convert_to_backend() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let error: SheetRestError = bad.expect_err("must fail").into();
        assert_eq!(error.kind(), "backend_error");
    }
}
