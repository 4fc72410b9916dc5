//! In-memory grid backend for exercising the service without a network.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use sheetrest_core::auth::Credential;
use sheetrest_core::error::{Result, SheetRestError};
use sheetrest_core::grid::Grid;
use sheetrest_core::traits::{GridBackend, RangeSpec};
use sheetrest_core::types::SheetMeta;

/// A single-sheet grid held in memory, with call accounting.
pub struct MemoryBackend {
    sheet_id: i64,
    title: String,
    index: u32,
    rows: Mutex<Vec<Vec<String>>>,
    append_calls: AtomicUsize,
    write_calls: AtomicUsize,
    fail_appends: Mutex<HashSet<usize>>,
}

impl MemoryBackend {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            sheet_id: 99,
            title: String::from("People"),
            index: 0,
            rows: Mutex::new(rows),
            append_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            fail_appends: Mutex::new(HashSet::new()),
        }
    }

    /// Builds grid rows from string literals.
    pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    /// Makes the nth append call (0-based) fail.
    pub fn fail_append(&self, ordinal: usize) {
        self.fail_appends.lock().unwrap().insert(ordinal);
    }

    /// Current grid contents.
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    /// Number of append calls issued, including failed ones.
    pub fn append_attempts(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Number of range writes issued.
    pub fn write_attempts(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn meta(&self) -> SheetMeta {
        let rows = self.rows.lock().unwrap();
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        SheetMeta {
            sheet_id: self.sheet_id,
            title: self.title.clone(),
            index: self.index,
            row_count: rows.len() as u32,
            column_count,
        }
    }
}

#[async_trait]
impl GridBackend for MemoryBackend {
    async fn sheet_meta(
        &self,
        _credential: &Credential,
        _document_id: &str,
        sheet_ref: &str,
    ) -> Result<SheetMeta> {
        // Same resolution as the real adapter: sheet id, tab index, title.
        let matches = sheet_ref == self.title
            || sheet_ref
                .parse::<i64>()
                .is_ok_and(|numeric| numeric == self.sheet_id || numeric == i64::from(self.index));
        if matches {
            Ok(self.meta())
        } else {
            Err(SheetRestError::sheet_not_found(sheet_ref))
        }
    }

    async fn read_range(
        &self,
        _credential: &Credential,
        _document_id: &str,
        _sheet: &SheetMeta,
        range: RangeSpec,
    ) -> Result<Grid> {
        let rows = self.rows.lock().unwrap();
        let selected: Vec<Vec<String>> = match range {
            RangeSpec::Full => rows.clone(),
            RangeSpec::Header => rows.first().cloned().into_iter().collect(),
            RangeSpec::Row(row_id) => rows
                .get(row_id as usize - 1)
                .cloned()
                .into_iter()
                .collect(),
        };
        Ok(Grid::new(selected))
    }

    async fn write_range(
        &self,
        _credential: &Credential,
        _document_id: &str,
        _sheet: &SheetMeta,
        range: RangeSpec,
        grid: Grid,
    ) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let RangeSpec::Row(row_id) = range else {
            return Err(SheetRestError::backend(
                "test backend writes single rows only",
            ));
        };
        let incoming = grid
            .into_rows()
            .into_iter()
            .next()
            .ok_or_else(|| SheetRestError::backend("empty write"))?;

        let mut rows = self.rows.lock().unwrap();
        let target = rows
            .get_mut(row_id as usize - 1)
            .ok_or_else(|| SheetRestError::backend("write out of grid range"))?;
        for (position, cell) in incoming.into_iter().enumerate() {
            if position < target.len() {
                target[position] = cell;
            } else {
                target.push(cell);
            }
        }
        Ok(())
    }

    async fn append_row(
        &self,
        _credential: &Credential,
        _document_id: &str,
        _sheet: &SheetMeta,
        row: Vec<String>,
    ) -> Result<u32> {
        let ordinal = self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.lock().unwrap().contains(&ordinal) {
            return Err(SheetRestError::backend(format!(
                "append rejected by test backend (call {ordinal})"
            )));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(row);
        Ok(rows.len() as u32)
    }
}
