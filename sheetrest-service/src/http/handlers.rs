//! Request handlers for the row resource.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;

use sheetrest_core::auth::{Credential, resolve_credential};
use sheetrest_core::codec::record_from_values;
use sheetrest_core::error::SheetRestError;
use sheetrest_core::traits::GridBackend;
use sheetrest_core::types::{BulkReport, CellValue, Page, Record, RowHandle, SheetInfo};
use sheetrest_core::view::RowFilter;

use super::AppState;
use super::error::ApiError;

/// Header carrying the caller's OAuth access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-google-access-token";

type ApiResult<T> = Result<Json<T>, ApiError>;

/// JSON object of API-boundary scalars, as sent by clients.
type ValueMap = IndexMap<String, CellValue>;

#[derive(Debug, Serialize)]
pub struct ServiceDescription {
    name: &'static str,
    version: &'static str,
    health: &'static str,
}

/// `GET /`: service identity.
pub async fn service_info() -> Json<ServiceDescription> {
    Json(ServiceDescription {
        name: "sheetrest",
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// `GET /{document_id}/{sheet_id}`: list rows with filters and pagination.
pub async fn list_rows<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((document_id, sheet_id)): Path<(String, String)>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> ApiResult<Vec<RowHandle>> {
    let credential = request_credential(&headers, &state)?;
    let (page, filter) = parse_list_query(params)?;
    let rows = state
        .rows
        .list(&credential, &document_id, &sheet_id, &filter, page)
        .await?;
    Ok(Json(rows))
}

/// `GET /{document_id}/{sheet_id}/info`: sheet description.
pub async fn sheet_info<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((document_id, sheet_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<SheetInfo> {
    let credential = request_credential(&headers, &state)?;
    let info = state
        .rows
        .info(&credential, &document_id, &sheet_id)
        .await?;
    Ok(Json(info))
}

/// `GET /{document_id}/{sheet_id}/{row_id}`: one row by absolute index.
pub async fn get_row<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    path: Result<Path<(String, String, i64)>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<RowHandle> {
    let Path((document_id, sheet_id, row_id)) = path.map_err(path_rejection)?;
    let credential = request_credential(&headers, &state)?;
    let row = state
        .rows
        .row(&credential, &document_id, &sheet_id, row_id)
        .await?;
    Ok(Json(row))
}

/// `POST /{document_id}/{sheet_id}`: append one record.
pub async fn create_row<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((document_id, sheet_id)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<ValueMap>, JsonRejection>,
) -> Result<(StatusCode, Json<RowHandle>), ApiError> {
    let credential = request_credential(&headers, &state)?;
    let record = record_body(payload)?;
    let row = state
        .rows
        .create(&credential, &document_id, &sheet_id, record)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PUT /{document_id}/{sheet_id}/{row_id}`: partial update of one row.
pub async fn update_row<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    path: Result<Path<(String, String, i64)>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<ValueMap>, JsonRejection>,
) -> ApiResult<RowHandle> {
    let Path((document_id, sheet_id, row_id)) = path.map_err(path_rejection)?;
    let credential = request_credential(&headers, &state)?;
    let patch = record_body(payload)?;
    let row = state
        .rows
        .update(&credential, &document_id, &sheet_id, row_id, patch)
        .await?;
    Ok(Json(row))
}

/// `POST /{document_id}/{sheet_id}/bulk`: best-effort batch append.
pub async fn bulk_create<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    Path((document_id, sheet_id)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<Vec<ValueMap>>, JsonRejection>,
) -> ApiResult<BulkReport> {
    let credential = request_credential(&headers, &state)?;
    let records = records_body(payload)?;
    let report = state
        .rows
        .bulk_create(&credential, &document_id, &sheet_id, records)
        .await?;
    Ok(Json(report))
}

/// `PUT /{document_id}/{sheet_id}/{row_id}/bulk`: best-effort batch update
/// of consecutive rows starting at `row_id`.
pub async fn bulk_update<B: GridBackend + 'static>(
    State(state): State<AppState<B>>,
    path: Result<Path<(String, String, i64)>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<Vec<ValueMap>>, JsonRejection>,
) -> ApiResult<BulkReport> {
    let Path((document_id, sheet_id, row_id)) = path.map_err(path_rejection)?;
    let credential = request_credential(&headers, &state)?;
    let patches = records_body(payload)?;
    let report = state
        .rows
        .bulk_update(&credential, &document_id, &sheet_id, row_id, patches)
        .await?;
    Ok(Json(report))
}

/// Resolves the request credential from the access-token header and the
/// configured API key.
fn request_credential<B>(headers: &HeaderMap, state: &AppState<B>) -> Result<Credential, ApiError> {
    let token = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    Ok(resolve_credential(token, &state.config)?)
}

/// Splits the query string into the page window and the column filters.
/// `offset` and `limit` are reserved names; every other pair filters.
fn parse_list_query(params: Vec<(String, String)>) -> Result<(Page, RowFilter), ApiError> {
    let mut page = Page::default();
    let mut pairs = Vec::new();
    for (name, value) in params {
        match name.as_str() {
            "offset" => page.offset = parse_integer("offset", &value)?,
            "limit" => page.limit = Some(parse_integer("limit", &value)?),
            _ => pairs.push((name, value)),
        }
    }
    Ok((page, RowFilter::new(pairs)))
}

fn parse_integer(parameter: &str, value: &str) -> Result<i64, ApiError> {
    value.parse().map_err(|_| {
        ApiError(SheetRestError::invalid_parameter(
            parameter,
            format!("expected an integer, got {value:?}"),
        ))
    })
}

fn record_body(payload: Result<Json<ValueMap>, JsonRejection>) -> Result<Record, ApiError> {
    let Json(values) = payload.map_err(body_rejection)?;
    Ok(record_from_values(values))
}

fn records_body(
    payload: Result<Json<Vec<ValueMap>>, JsonRejection>,
) -> Result<Vec<Record>, ApiError> {
    let Json(items) = payload.map_err(body_rejection)?;
    Ok(items.into_iter().map(record_from_values).collect())
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    ApiError(SheetRestError::invalid_parameter(
        "body",
        rejection.body_text(),
    ))
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    ApiError(SheetRestError::invalid_parameter(
        "path",
        rejection.body_text(),
    ))
}
