//! Filtered, paginated projection of data rows.
//!
//! Selection always filters first and paginates second, so `offset`/`limit`
//! window the matching rows, while `row_id` keeps pointing at the row's grid
//! position.

use crate::codec::decode_row;
use crate::error::{Result, SheetRestError};
use crate::grid::Header;
use crate::types::{Page, Record, RowHandle};

/// Absolute grid index of the first data row; row 1 is the header.
pub const FIRST_DATA_ROW: u32 = 2;

/// Conjunction of exact column=value matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pairs: Vec<(String, String)>,
}

impl RowFilter {
    /// Builds a filter from column/value pairs.
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Whether the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Checks every filtered column against the header.
    ///
    /// # Errors
    /// Returns an unknown-column error naming the first column the header
    /// does not define.
    pub fn validate(&self, header: &Header) -> Result<()> {
        for (column, _) in &self.pairs {
            if !header.contains(column) {
                return Err(SheetRestError::unknown_column(column));
            }
        }
        Ok(())
    }

    /// Whether a record satisfies every condition. Comparison is exact
    /// string equality on cell text.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.pairs
            .iter()
            .all(|(column, value)| record.get(column).is_some_and(|cell| cell == value))
    }
}

/// Applies the page window to an already-filtered sequence.
///
/// The returned length is always `max(0, min(limit, len - offset))`.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let total = items.len();
    let start = usize::try_from(page.offset.max(0))
        .unwrap_or(usize::MAX)
        .min(total);
    let end = match page.limit {
        None => total,
        Some(limit) if limit <= 0 => start,
        Some(limit) => start
            .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
            .min(total),
    };
    items
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect()
}

/// Decodes, filters, then paginates the data rows.
///
/// # Errors
/// Returns an unknown-column error when the filter names a column outside
/// the header.
pub fn select_rows(
    header: &Header,
    data: &[Vec<String>],
    filter: &RowFilter,
    page: Page,
) -> Result<Vec<RowHandle>> {
    filter.validate(header)?;
    let filtered: Vec<RowHandle> = data
        .iter()
        .enumerate()
        .map(|(position, row)| RowHandle {
            row_id: u32::try_from(position)
                .map_or(u32::MAX, |offset| FIRST_DATA_ROW.saturating_add(offset)),
            record: decode_row(header, row),
        })
        .filter(|handle| filter.matches(&handle.record))
        .collect();
    Ok(paginate(filtered, page))
}

/// Decodes the data row at an absolute grid index.
///
/// # Errors
/// Returns a row-not-found error when `row_id` points at the header
/// (`row_id <= 1`) or beyond the data rows.
pub fn row_at(header: &Header, data: &[Vec<String>], row_id: i64) -> Result<RowHandle> {
    let position = data_position(row_id, data.len())
        .ok_or_else(|| SheetRestError::row_not_found(row_id))?;
    let id = u32::try_from(row_id).map_err(|_| SheetRestError::row_not_found(row_id))?;
    Ok(RowHandle {
        row_id: id,
        record: decode_row(header, &data[position]),
    })
}

/// Maps an absolute row id to a position in the data rows.
fn data_position(row_id: i64, data_len: usize) -> Option<usize> {
    if row_id < i64::from(FIRST_DATA_ROW) {
        return None;
    }
    let position = usize::try_from(row_id - i64::from(FIRST_DATA_ROW)).ok()?;
    (position < data_len).then_some(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Header;
    use pretty_assertions::assert_eq;

    fn header(names: &[&str]) -> Header {
        Header::new(names.iter().map(|name| (*name).to_string()).collect()).expect("valid header")
    }

    fn data(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    fn filter(pairs: &[(&str, &str)]) -> RowFilter {
        RowFilter::new(
            pairs
                .iter()
                .map(|(column, value)| ((*column).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    fn people() -> (Header, Vec<Vec<String>>) {
        (
            header(&["name", "age"]),
            data(&[&["Ann", "30"], &["Bob", "25"], &["Cid", "25"]]),
        )
    }

    #[test]
    fn selects_all_rows_with_grid_positions() {
        let (header, rows) = people();
        let selected =
            select_rows(&header, &rows, &RowFilter::default(), Page::default()).expect("select");
        let ids: Vec<u32> = selected.iter().map(|handle| handle.row_id).collect();
        assert_eq!(ids, [2, 3, 4]);
        assert_eq!(selected[0].record.get("name"), Some(&String::from("Ann")));
    }

    #[test]
    fn filter_keeps_grid_row_ids() {
        let (header, rows) = people();
        let selected =
            select_rows(&header, &rows, &filter(&[("age", "25")]), Page::default())
                .expect("select");
        let ids: Vec<u32> = selected.iter().map(|handle| handle.row_id).collect();
        assert_eq!(ids, [3, 4]);
    }

    #[test]
    fn filter_is_exact_string_equality() {
        let (header, rows) = people();
        let selected = select_rows(&header, &rows, &filter(&[("age", "2")]), Page::default())
            .expect("select");
        assert!(selected.is_empty());
    }

    #[test]
    fn multiple_conditions_are_a_conjunction() {
        let (header, rows) = people();
        let selected = select_rows(
            &header,
            &rows,
            &filter(&[("age", "25"), ("name", "Bob")]),
            Page::default(),
        )
        .expect("select");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].row_id, 3);
    }

    #[test]
    fn unknown_filter_column_is_rejected() {
        let (header, rows) = people();
        let error = select_rows(&header, &rows, &filter(&[("city", "Oslo")]), Page::default())
            .expect_err("must fail");
        assert_eq!(error.kind(), "unknown_column");
    }

    #[test]
    fn pagination_applies_after_filtering() {
        let (header, rows) = people();
        let selected = select_rows(
            &header,
            &rows,
            &filter(&[("age", "25")]),
            Page::new(1, Some(5)),
        )
        .expect("select");
        let ids: Vec<u32> = selected.iter().map(|handle| handle.row_id).collect();
        assert_eq!(ids, [4]);
    }

    #[test]
    fn negative_offset_reads_as_zero() {
        let out = paginate(vec![1, 2, 3], Page::new(-4, None));
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn offset_beyond_end_yields_nothing() {
        let out = paginate(vec![1, 2, 3], Page::new(7, Some(2)));
        assert!(out.is_empty());
    }

    #[test]
    fn zero_or_negative_limit_yields_nothing() {
        assert!(paginate(vec![1, 2, 3], Page::new(0, Some(0))).is_empty());
        assert!(paginate(vec![1, 2, 3], Page::new(1, Some(-2))).is_empty());
    }

    #[test]
    fn absent_limit_takes_all_remaining() {
        let out = paginate(vec![1, 2, 3, 4], Page::new(2, None));
        assert_eq!(out, [3, 4]);
    }

    #[test]
    fn limit_truncates_at_end() {
        let out = paginate(vec![1, 2, 3], Page::new(2, Some(10)));
        assert_eq!(out, [3]);
    }

    #[test]
    fn row_at_resolves_absolute_ids() {
        let (header, rows) = people();
        let handle = row_at(&header, &rows, 3).expect("row 3");
        assert_eq!(handle.row_id, 3);
        assert_eq!(handle.record.get("name"), Some(&String::from("Bob")));
    }

    #[test]
    fn header_row_is_not_addressable() {
        let (header, rows) = people();
        assert_eq!(
            row_at(&header, &rows, 1).expect_err("header").kind(),
            "row_not_found"
        );
        assert_eq!(
            row_at(&header, &rows, 0).expect_err("zero").kind(),
            "row_not_found"
        );
        assert_eq!(
            row_at(&header, &rows, -3).expect_err("negative").kind(),
            "row_not_found"
        );
    }

    #[test]
    fn rows_beyond_data_are_not_found() {
        let (header, rows) = people();
        let error = row_at(&header, &rows, 5).expect_err("beyond");
        assert_eq!(error.kind(), "row_not_found");
        assert_eq!(error.to_string(), "row 5 not found");
    }
}
