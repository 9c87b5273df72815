//! View pipeline: search -> filter -> sort, in that fixed order.
//!
//! Pure and deterministic: the output order is fully derived from
//! (rows, columns, view config, search term), so the renderer can
//! recompute it on every state change without caching. Grouping is
//! applied by the renderer afterwards, over this output; it is not part
//! of the pipeline.

use crate::column::Column;
use crate::filter;
use crate::sheet::{Row, Sheet};
use crate::sort;
use crate::view::View;

/// Rows of `sheet` visible under `view` and `search_term`, in display
/// order. Non-table sheets have no rows and yield an empty list.
pub fn derive_visible_rows(sheet: &Sheet, view: &View, search_term: &str) -> Vec<Row> {
    let columns = sheet.columns();
    let rows: Vec<Row> = sheet
        .rows()
        .iter()
        .filter(|row| matches_search(row, columns, search_term))
        .filter(|row| filter::matches(row, &view.config.filters, view.config.match_type, columns))
        .cloned()
        .collect();

    match &view.config.sort {
        Some(rule) => sort::sort_rows(&rows, rule, columns),
        None => rows,
    }
}

/// Free-text search: the row matches if ANY column's stringified value
/// contains the term, case-insensitive. An empty term matches all rows.
fn matches_search(row: &Row, columns: &[Column], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    columns
        .iter()
        .any(|c| row.value(c.id).to_display().to_lowercase().contains(&needle))
}
