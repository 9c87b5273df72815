//! Grouping engine.
//!
//! Partitions an already filtered+sorted row slice into ordered buckets
//! keyed by a column's stringified value. Purely a rendering partition:
//! it never changes filter or sort results, which are computed first.

use crate::column::Column;
use crate::sheet::{ColumnId, Row};

/// Reserved bucket for rows with a missing or empty group value.
pub const UNGROUPED: &str = "Ungrouped";

/// Bucket rows by `group_by`. Bucket order:
/// 1. the column's select options, in option order (empty groups kept),
/// 2. dynamically discovered keys in first-seen row order,
/// 3. the reserved ungrouped bucket, always last.
pub fn group_rows<'a>(
    rows: &'a [Row],
    group_by: ColumnId,
    columns: &[Column],
) -> Vec<(String, Vec<&'a Row>)> {
    let mut buckets: Vec<(String, Vec<&Row>)> = Vec::new();
    if let Some(column) = columns.iter().find(|c| c.id == group_by) {
        for option in &column.options {
            buckets.push((option.label.clone(), Vec::new()));
        }
    }

    let mut ungrouped: Vec<&Row> = Vec::new();
    for row in rows {
        let key = row.value(group_by).to_display();
        if key.is_empty() {
            ungrouped.push(row);
            continue;
        }
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(row),
            None => buckets.push((key, vec![row])),
        }
    }

    buckets.push((UNGROUPED.to_string(), ungrouped));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnType, SelectOption};
    use crate::sheet::RowId;
    use crate::value::Value;

    fn status_column(col: ColumnId) -> Column {
        Column::new(col, "Status", ColumnType::Select).with_options(vec![
            SelectOption::new("o1", "进行中", "blue"),
            SelectOption::new("o2", "已完成", "green"),
            SelectOption::new("o3", "待办", "gray"),
        ])
    }

    fn row(id: u64, col: ColumnId, value: Value) -> Row {
        let mut row = Row::new(RowId(id));
        row.set(col, value);
        row
    }

    #[test]
    fn test_option_buckets_preseeded_in_order() {
        // No row is 待办, the bucket still appears (empty) before Ungrouped
        let col = ColumnId(1);
        let cols = vec![status_column(col)];
        let rows = vec![
            row(1, col, Value::Text("已完成".into())),
            row(2, col, Value::Text("进行中".into())),
            row(3, col, Value::Empty),
        ];
        let groups = group_rows(&rows, col, &cols);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["进行中", "已完成", "待办", UNGROUPED]);

        let by_key = |k: &str| groups.iter().find(|(key, _)| key == k).unwrap().1.len();
        assert_eq!(by_key("进行中"), 1);
        assert_eq!(by_key("已完成"), 1);
        assert_eq!(by_key("待办"), 0);
        assert_eq!(by_key(UNGROUPED), 1);
    }

    #[test]
    fn test_dynamic_keys_follow_options() {
        let col = ColumnId(1);
        let cols = vec![status_column(col)];
        let rows = vec![
            row(1, col, Value::Text("surprise".into())),
            row(2, col, Value::Text("进行中".into())),
        ];
        let groups = group_rows(&rows, col, &cols);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        // Pre-seeded options first, then the discovered key, then Ungrouped
        assert_eq!(keys, vec!["进行中", "已完成", "待办", "surprise", UNGROUPED]);
    }

    #[test]
    fn test_grouping_by_plain_column() {
        let col = ColumnId(2);
        let cols = vec![Column::new(col, "Owner", ColumnType::Text)];
        let rows = vec![
            row(1, col, Value::Text("ana".into())),
            row(2, col, Value::Text("bo".into())),
            row(3, col, Value::Text("ana".into())),
        ];
        let groups = group_rows(&rows, col, &cols);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ana", "bo", UNGROUPED]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_grouping_preserves_row_order_within_bucket() {
        let col = ColumnId(1);
        let cols = vec![Column::new(col, "K", ColumnType::Text)];
        let rows = vec![
            row(5, col, Value::Text("a".into())),
            row(3, col, Value::Text("a".into())),
            row(9, col, Value::Text("a".into())),
        ];
        let groups = group_rows(&rows, col, &cols);
        let ids: Vec<RowId> = groups[0].1.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RowId(5), RowId(3), RowId(9)]);
    }
}
