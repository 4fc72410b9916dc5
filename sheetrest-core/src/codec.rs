//! Positional codec between grid rows and keyed records.
//!
//! The codec is the heart of the translation layer: decoding zips a data row
//! with the header, encoding lays a record back out in header order. Both
//! directions are total, padding short rows and filling absent keys with
//! empty cells, so `decode(H, encode(H, R)) == R` holds for any record over
//! the header's columns.

use indexmap::IndexMap;

use crate::grid::Header;
use crate::types::{CellValue, Record};

/// Decodes one data row against the header.
///
/// Rows shorter than the header pad with empty cells; cells beyond the
/// header length are dropped. The result has exactly one entry per column,
/// in header order.
#[must_use]
pub fn decode_row(header: &Header, row: &[String]) -> Record {
    header
        .names()
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let cell = row.get(position).cloned().unwrap_or_default();
            (name.clone(), cell)
        })
        .collect()
}

/// Encodes a record into a grid row in header order.
///
/// A key absent from the record encodes as an empty cell; record keys the
/// header does not define are ignored. The result always has exactly
/// header-length cells.
#[must_use]
pub fn encode_record(header: &Header, record: &Record) -> Vec<String> {
    header
        .names()
        .iter()
        .map(|name| record.get(name).cloned().unwrap_or_default())
        .collect()
}

/// Merges a partial update into a decoded record.
///
/// Only patch keys the header defines overwrite; everything else in the
/// record is preserved. Key order stays the record's (header) order.
pub fn apply_patch(header: &Header, record: &mut Record, patch: &Record) {
    for (key, value) in patch {
        if header.contains(key) {
            record.insert(key.clone(), value.clone());
        }
    }
}

/// Coerces an API-boundary value map into a record of cell text.
#[must_use]
pub fn record_from_values(values: IndexMap<String, CellValue>) -> Record {
    values
        .into_iter()
        .map(|(key, value)| (key, value.into_cell_text()))
        .collect()
}
