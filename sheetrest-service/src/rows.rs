//! Row-level operations over one sheet.
//!
//! `RowService` orchestrates the translation layer against a grid backend.
//! It keeps no state between requests: sheet metadata and header are
//! re-resolved on every call, so spreadsheet edits are visible immediately.
//! Write operations check the credential before touching the backend.

use tracing::{debug, warn};

use sheetrest_core::auth::Credential;
use sheetrest_core::codec::{apply_patch, decode_row, encode_record};
use sheetrest_core::error::Result;
use sheetrest_core::grid::{Grid, Header, split_header};
use sheetrest_core::traits::{GridBackend, RangeSpec};
use sheetrest_core::types::{BulkReport, Page, Record, RowHandle, SheetInfo, SheetMeta};
use sheetrest_core::view::{RowFilter, row_at, select_rows};

/// CRUD orchestrator for the row resource.
pub struct RowService<B> {
    backend: B,
}

impl<B: GridBackend> RowService<B> {
    /// Wraps a grid backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Lists rows: one full-range read, then filter and paginate.
    ///
    /// # Errors
    /// Fails on backend errors, an unusable header, or a filter naming an
    /// unknown column.
    pub async fn list(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        filter: &RowFilter,
        page: Page,
    ) -> Result<Vec<RowHandle>> {
        let (_, header, data) = self.load(credential, document_id, sheet_ref).await?;
        debug!(document_id, sheet_ref, rows = data.len(), "listing rows");
        select_rows(&header, &data, filter, page)
    }

    /// Describes the sheet: metadata plus a header-only read.
    ///
    /// # Errors
    /// Fails on backend errors or an unusable header.
    pub async fn info(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
    ) -> Result<SheetInfo> {
        let meta = self
            .backend
            .sheet_meta(credential, document_id, sheet_ref)
            .await?;
        let header = self
            .header_only(credential, document_id, &meta, sheet_ref)
            .await?;
        Ok(SheetInfo {
            sheet_id: meta.sheet_id,
            title: meta.title,
            index: meta.index,
            header: header.names().to_vec(),
            row_count: meta.row_count,
            column_count: meta.column_count,
            data_rows: meta.row_count.saturating_sub(1),
        })
    }

    /// Fetches one row by its absolute grid index.
    ///
    /// # Errors
    /// Fails with row-not-found when the id addresses the header or lies
    /// beyond the data rows.
    pub async fn row(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        row_id: i64,
    ) -> Result<RowHandle> {
        let (_, header, data) = self.load(credential, document_id, sheet_ref).await?;
        row_at(&header, &data, row_id)
    }

    /// Appends one record and returns it with its assigned row index.
    ///
    /// # Errors
    /// Fails with read-only-credential before any backend write when the
    /// credential cannot write.
    pub async fn create(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        record: Record,
    ) -> Result<RowHandle> {
        credential.ensure_writable("create row")?;
        let meta = self
            .backend
            .sheet_meta(credential, document_id, sheet_ref)
            .await?;
        let header = self
            .header_only(credential, document_id, &meta, sheet_ref)
            .await?;

        let cells = encode_record(&header, &record);
        let row_id = self
            .backend
            .append_row(credential, document_id, &meta, cells.clone())
            .await?;
        debug!(document_id, sheet_ref, row_id, "created row");
        Ok(RowHandle {
            row_id,
            record: decode_row(&header, &cells),
        })
    }

    /// Partially updates one row: merge the patch over the current record,
    /// then write the full row back.
    ///
    /// # Errors
    /// Fails with read-only-credential before any backend write, or with
    /// row-not-found for an unaddressable id.
    pub async fn update(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        row_id: i64,
        patch: Record,
    ) -> Result<RowHandle> {
        credential.ensure_writable("update row")?;
        let (meta, header, data) = self.load(credential, document_id, sheet_ref).await?;
        let merged = self
            .write_merged(credential, document_id, &meta, &header, &data, row_id, &patch)
            .await?;
        debug!(document_id, sheet_ref, row_id = merged.row_id, "updated row");
        Ok(merged)
    }

    /// Appends every record, best-effort, reporting per-item outcomes.
    ///
    /// # Errors
    /// Fails as a whole only before processing starts (credential or header
    /// problems); item failures land in the report.
    pub async fn bulk_create(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        records: Vec<Record>,
    ) -> Result<BulkReport> {
        credential.ensure_writable("bulk create rows")?;
        let meta = self
            .backend
            .sheet_meta(credential, document_id, sheet_ref)
            .await?;
        let header = self
            .header_only(credential, document_id, &meta, sheet_ref)
            .await?;

        let mut report = BulkReport::default();
        for (index, record) in records.into_iter().enumerate() {
            let cells = encode_record(&header, &record);
            match self
                .backend
                .append_row(credential, document_id, &meta, cells)
                .await
            {
                Ok(row_id) => report.record_success(index, row_id),
                Err(error) => {
                    warn!(document_id, sheet_ref, index, %error, "bulk create item failed");
                    report.record_failure(index, error.to_string());
                }
            }
        }
        debug!(
            document_id,
            sheet_ref,
            succeeded = report.succeeded,
            failed = report.failed,
            "bulk create finished"
        );
        Ok(report)
    }

    /// Updates consecutive rows starting at `start_row_id`, one patch per
    /// row, best-effort per item.
    ///
    /// # Errors
    /// Fails as a whole only before processing starts; item failures land in
    /// the report.
    pub async fn bulk_update(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
        start_row_id: i64,
        patches: Vec<Record>,
    ) -> Result<BulkReport> {
        credential.ensure_writable("bulk update rows")?;
        let (meta, header, data) = self.load(credential, document_id, sheet_ref).await?;

        let mut report = BulkReport::default();
        for (index, patch) in patches.into_iter().enumerate() {
            // Saturates instead of overflowing; a saturated id is past the
            // data and fails the item as row-not-found.
            let row_id = i64::try_from(index)
                .map_or(i64::MAX, |offset| start_row_id.saturating_add(offset));
            match self
                .write_merged(credential, document_id, &meta, &header, &data, row_id, &patch)
                .await
            {
                Ok(merged) => report.record_success(index, merged.row_id),
                Err(error) => {
                    warn!(document_id, sheet_ref, index, %error, "bulk update item failed");
                    report.record_failure(index, error.to_string());
                }
            }
        }
        debug!(
            document_id,
            sheet_ref,
            succeeded = report.succeeded,
            failed = report.failed,
            "bulk update finished"
        );
        Ok(report)
    }

    /// Merges a patch into the row at `row_id` and writes the row back.
    async fn write_merged(
        &self,
        credential: &Credential,
        document_id: &str,
        meta: &SheetMeta,
        header: &Header,
        data: &[Vec<String>],
        row_id: i64,
        patch: &Record,
    ) -> Result<RowHandle> {
        let mut handle = row_at(header, data, row_id)?;
        apply_patch(header, &mut handle.record, patch);
        let cells = encode_record(header, &handle.record);
        self.backend
            .write_range(
                credential,
                document_id,
                meta,
                RangeSpec::Row(handle.row_id),
                Grid::new(vec![cells]),
            )
            .await?;
        Ok(handle)
    }

    /// One full-range read split into header and data rows.
    async fn load(
        &self,
        credential: &Credential,
        document_id: &str,
        sheet_ref: &str,
    ) -> Result<(SheetMeta, Header, Vec<Vec<String>>)> {
        let meta = self
            .backend
            .sheet_meta(credential, document_id, sheet_ref)
            .await?;
        let grid = self
            .backend
            .read_range(credential, document_id, &meta, RangeSpec::Full)
            .await?;
        let (header, data) = split_header(grid, sheet_ref)?;
        Ok((meta, header, data))
    }

    /// Header-only read, for operations that never touch data rows.
    async fn header_only(
        &self,
        credential: &Credential,
        document_id: &str,
        meta: &SheetMeta,
        sheet_ref: &str,
    ) -> Result<Header> {
        let grid = self
            .backend
            .read_range(credential, document_id, meta, RangeSpec::Header)
            .await?;
        let (header, _) = split_header(grid, sheet_ref)?;
        Ok(header)
    }
}
