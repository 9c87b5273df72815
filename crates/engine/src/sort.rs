//! Sort engine.
//!
//! One active rule (column + direction), applied as a stable, non-mutating
//! reorder. Blanks always sink to the tail in both directions, so flipping
//! the direction never surfaces a wall of empty cells at the top.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::column::Column;
use crate::sheet::Row;
use crate::value::Value;
use crate::view::{SortDirection, SortRule};

/// Return the rows reordered by `rule`. Stable for equal keys; input
/// order is preserved when the rule's column no longer exists.
pub fn sort_rows(rows: &[Row], rule: &SortRule, columns: &[Column]) -> Vec<Row> {
    let mut out = rows.to_vec();
    if !columns.iter().any(|c| c.id == rule.column) {
        return out; // stale rule: inert
    }
    out.sort_by(|a, b| compare(a.value(rule.column), b.value(rule.column), rule.direction));
    out
}

/// Compare two cell values under a direction.
pub fn compare(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    // Blank placement is direction-independent.
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let ord = match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => OrderedFloat(x).cmp(&OrderedFloat(y)),
        _ => a
            .to_display()
            .to_lowercase()
            .cmp(&b.to_display().to_lowercase()),
    };
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use crate::sheet::{ColumnId, Row, RowId};

    fn rows_with(col: ColumnId, values: &[Value]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut row = Row::new(RowId(i as u64 + 1));
                row.set(col, v.clone());
                row
            })
            .collect()
    }

    fn number_column() -> (ColumnId, Vec<Column>) {
        let id = ColumnId(1);
        (id, vec![Column::new(id, "Budget", ColumnType::Number)])
    }

    #[test]
    fn test_descending_keeps_blanks_last() {
        // Budgets [12000, null, 45000] -> [45000, 12000, null]
        let (col, cols) = number_column();
        let rows = rows_with(col, &[Value::Number(12000.0), Value::Empty, Value::Number(45000.0)]);
        let rule = SortRule { column: col, direction: SortDirection::Descending };
        let sorted = sort_rows(&rows, &rule, &cols);
        let order: Vec<&Value> = sorted.iter().map(|r| r.value(col)).collect();
        assert_eq!(order, vec![&Value::Number(45000.0), &Value::Number(12000.0), &Value::Empty]);
    }

    #[test]
    fn test_ascending_also_keeps_blanks_last() {
        let (col, cols) = number_column();
        let rows = rows_with(col, &[Value::Empty, Value::Number(2.0), Value::Number(1.0)]);
        let rule = SortRule { column: col, direction: SortDirection::Ascending };
        let sorted = sort_rows(&rows, &rule, &cols);
        let order: Vec<&Value> = sorted.iter().map(|r| r.value(col)).collect();
        assert_eq!(order, vec![&Value::Number(1.0), &Value::Number(2.0), &Value::Empty]);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let (col, cols) = number_column();
        let mut rows = rows_with(col, &[Value::Number(1.0), Value::Number(1.0), Value::Number(1.0)]);
        rows[0].id = RowId(10);
        rows[1].id = RowId(20);
        rows[2].id = RowId(30);
        let rule = SortRule { column: col, direction: SortDirection::Descending };
        let sorted = sort_rows(&rows, &rule, &cols);
        let ids: Vec<RowId> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RowId(10), RowId(20), RowId(30)]);
    }

    #[test]
    fn test_text_sort_case_insensitive() {
        let col = ColumnId(1);
        let cols = vec![Column::new(col, "Name", ColumnType::Text)];
        let rows = rows_with(
            col,
            &[
                Value::Text("banana".into()),
                Value::Text("Apple".into()),
                Value::Text("cherry".into()),
            ],
        );
        let rule = SortRule { column: col, direction: SortDirection::Ascending };
        let sorted = sort_rows(&rows, &rule, &cols);
        let names: Vec<String> = sorted.iter().map(|r| r.value(col).to_display()).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_numeric_text_compares_numerically() {
        let col = ColumnId(1);
        let cols = vec![Column::new(col, "N", ColumnType::Text)];
        let rows = rows_with(col, &[Value::Text("10".into()), Value::Text("9".into())]);
        let rule = SortRule { column: col, direction: SortDirection::Ascending };
        let sorted = sort_rows(&rows, &rule, &cols);
        assert_eq!(sorted[0].value(col).to_display(), "9");
    }

    #[test]
    fn test_stale_rule_preserves_input_order() {
        let (col, cols) = number_column();
        let rows = rows_with(col, &[Value::Number(2.0), Value::Number(1.0)]);
        let rule = SortRule { column: ColumnId(99), direction: SortDirection::Ascending };
        let sorted = sort_rows(&rows, &rule, &cols);
        assert_eq!(sorted[0].id, rows[0].id);
        assert_eq!(sorted[1].id, rows[1].id);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let (col, cols) = number_column();
        let rows = rows_with(col, &[Value::Number(2.0), Value::Number(1.0)]);
        let rule = SortRule { column: col, direction: SortDirection::Ascending };
        let _ = sort_rows(&rows, &rule, &cols);
        assert_eq!(rows[0].value(col), &Value::Number(2.0));
    }
}
