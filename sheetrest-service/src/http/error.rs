//! Error mapping onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use sheetrest_core::error::SheetRestError;

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error discriminant, e.g. `row_not_found`.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Service error carried through axum handlers.
#[derive(Debug)]
pub struct ApiError(pub SheetRestError);

impl From<SheetRestError> for ApiError {
    fn from(error: SheetRestError) -> Self {
        Self(error)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SheetRestError::EmptySheet { .. } | SheetRestError::InvalidHeader { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SheetRestError::UnknownColumn { .. } | SheetRestError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            SheetRestError::RowNotFound { .. } | SheetRestError::SheetNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            SheetRestError::MissingCredential => StatusCode::UNAUTHORIZED,
            SheetRestError::ReadOnlyCredential { .. } => StatusCode::FORBIDDEN,
            SheetRestError::Config { .. } | SheetRestError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SheetRestError::Backend { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(kind = self.0.kind(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (SheetRestError::empty_sheet("People"), 422),
            (SheetRestError::invalid_header("blank"), 422),
            (SheetRestError::unknown_column("city"), 400),
            (SheetRestError::invalid_parameter("offset", "not a number"), 400),
            (SheetRestError::row_not_found(1), 404),
            (SheetRestError::sheet_not_found("Missing"), 404),
            (SheetRestError::MissingCredential, 401),
            (SheetRestError::read_only("create row"), 403),
            (SheetRestError::config("bad"), 500),
            (SheetRestError::backend("down"), 502),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError(error).status().as_u16(), expected);
        }
    }
}
