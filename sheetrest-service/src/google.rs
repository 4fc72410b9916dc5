//! Google Sheets v4 backend.
//!
//! Thin reqwest client over the Sheets REST API. Reads go through
//! `values.get`, single-row writes through `values.update`, creation through
//! `values.append` with `RAW` input so cell text lands verbatim. Sheet
//! references resolve against document metadata in order: sheet id, tab
//! index, then title.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use sheetrest_core::auth::Credential;
use sheetrest_core::config::GoogleConfig;
use sheetrest_core::error::{Result, SheetRestError};
use sheetrest_core::grid::Grid;
use sheetrest_core::traits::{GridBackend, RangeSpec};
use sheetrest_core::types::SheetMeta;

const META_FIELDS: &str =
    "sheets(properties(sheetId,title,index,gridProperties(rowCount,columnCount)))";

/// Backend implementation against the Google Sheets v4 API.
pub struct GoogleSheetsBackend {
    http: Client,
    base_url: Url,
}

impl GoogleSheetsBackend {
    /// Builds the backend from the Google section of the configuration.
    ///
    /// # Errors
    /// Returns a configuration error when the base URL is unusable or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &GoogleConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|error| {
            SheetRestError::config(format!(
                "invalid Google API base URL {:?}: {error}",
                config.base_url
            ))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|error| {
                SheetRestError::config(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self { http, base_url })
    }

    /// Builds a URL under the spreadsheet base path.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| SheetRestError::config("Google API base URL cannot be a base"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Attaches the request credential: bearer token or `key` parameter.
    fn authorize(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        match credential {
            Credential::OAuth(token) => request.bearer_auth(token),
            Credential::ApiKey(key) => request.query(&[("key", key.as_str())]),
        }
    }

    /// Sends a request and decodes the JSON response, mapping failures into
    /// backend errors.
    async fn execute<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }
        response.json::<T>().await.map_err(transport_error)
    }
}

#[async_trait]
impl GridBackend for GoogleSheetsBackend {
    async fn sheet_meta(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
    ) -> Result<SheetMeta> {
        let mut url = self.url(&[document_id])?;
        url.query_pairs_mut().append_pair("fields", META_FIELDS);
        debug!(document_id, sheet_ref, "fetching sheet metadata");

        let document: SpreadsheetResponse = self
            .execute(self.authorize(self.http.get(url), credential))
            .await?;
        let sheets = document
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .collect();
        pick_sheet(sheets, sheet_ref).map(SheetMeta::from)
    }

    async fn read_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
    ) -> Result<Grid> {
        let a1 = range.to_a1(&sheet.title);
        let url = self.url(&[document_id, "values", &a1])?;
        debug!(document_id, range = %a1, "reading range");

        let values: ValueRange = self
            .execute(self.authorize(self.http.get(url), credential))
            .await?;
        let rows = values
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Ok(Grid::new(rows))
    }

    async fn write_range(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        range: RangeSpec,
        grid: Grid,
    ) -> Result<()> {
        let a1 = range.to_a1(&sheet.title);
        let mut url = self.url(&[document_id, "values", &a1])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        debug!(document_id, range = %a1, "writing range");

        let body = ValueWriteRequest {
            values: grid.into_rows(),
        };
        let _: Value = self
            .execute(self.authorize(self.http.put(url).json(&body), credential))
            .await?;
        Ok(())
    }

    async fn append_row(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet: &SheetMeta,
        row: Vec<String>,
    ) -> Result<u32> {
        let a1 = RangeSpec::Full.to_a1(&sheet.title);
        let append_target = format!("{a1}:append");
        let mut url = self.url(&[document_id, "values", &append_target])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        debug!(document_id, sheet = %sheet.title, "appending row");

        let body = ValueWriteRequest { values: vec![row] };
        let response: AppendResponse = self
            .execute(self.authorize(self.http.post(url).json(&body), credential))
            .await?;
        appended_row_index(&response)
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    grid_properties: GridProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridProperties {
    #[serde(default)]
    row_count: u32,
    #[serde(default)]
    column_count: u32,
}

impl From<SheetProperties> for SheetMeta {
    fn from(properties: SheetProperties) -> Self {
        Self {
            sheet_id: properties.sheet_id,
            title: properties.title,
            index: properties.index,
            row_count: properties.grid_properties.row_count,
            column_count: properties.grid_properties.column_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueWriteRequest {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Selects the addressed sheet. Numeric references try the sheet id, then
/// the tab index; any reference that still misses is matched against titles,
/// so a tab literally named `"42"` stays reachable.
fn pick_sheet(mut sheets: Vec<SheetProperties>, sheet_ref: &str) -> Result<SheetProperties> {
    let numeric = sheet_ref.parse::<i64>().ok();
    let found = numeric
        .and_then(|id| sheets.iter().position(|sheet| sheet.sheet_id == id))
        .or_else(|| {
            numeric
                .and_then(|id| u32::try_from(id).ok())
                .and_then(|index| sheets.iter().position(|sheet| sheet.index == index))
        })
        .or_else(|| sheets.iter().position(|sheet| sheet.title == sheet_ref));
    match found {
        Some(position) => Ok(sheets.swap_remove(position)),
        None => Err(SheetRestError::sheet_not_found(sheet_ref)),
    }
}

/// Stringifies one cell of a value range. The API returns JSON scalars;
/// formatted reads make most of them strings already.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => String::from("TRUE"),
        Value::Bool(false) => String::from("FALSE"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Pulls the assigned row index out of an append response.
fn appended_row_index(response: &AppendResponse) -> Result<u32> {
    response
        .updates
        .as_ref()
        .and_then(|updates| updates.updated_range.as_deref())
        .and_then(row_index_from_a1)
        .ok_or_else(|| {
            SheetRestError::backend("append succeeded but the response carried no updated range")
        })
}

/// Extracts the first row number from an A1 range like `'My Sheet'!A5:B5`.
fn row_index_from_a1(range: &str) -> Option<u32> {
    let cell = range.rsplit('!').next()?;
    let digits: String = cell
        .chars()
        .skip_while(|character| !character.is_ascii_digit())
        .take_while(|character| character.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn transport_error(error: reqwest::Error) -> SheetRestError {
    match error.status() {
        Some(status) => SheetRestError::backend_status(
            status.as_u16(),
            format!("Google Sheets request failed: {error}"),
        ),
        None => SheetRestError::backend(format!("Google Sheets request failed: {error}")),
    }
}

/// Shapes a non-2xx response into a backend error, preferring the message
/// from Google's error envelope when the body carries one.
fn api_error(status: u16, body: &str) -> SheetRestError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|detail| detail.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            let mut body = body.trim().to_string();
            body.truncate(200);
            body
        });
    SheetRestError::backend_status(status, format!("Google Sheets API error: {message}"))
}
