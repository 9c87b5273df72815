//! Filter evaluator.
//!
//! Per-row predicate evaluation with And/Or combination. Null handling is
//! asymmetric on purpose: a filter that has not been given a usable value
//! never hides data (vacuously true), while a row that lacks data fails
//! strict comparisons (excluded). A filter whose column no longer exists
//! is inert: always true, pruned later by the column-deletion cascade.

use crate::column::{Column, ColumnType, FilterOperator};
use crate::sheet::Row;
use crate::value::{self, Value};
use crate::view::{Filter, MatchType};

/// Combine per-filter results. An empty filter list matches every row.
pub fn matches(row: &Row, filters: &[Filter], match_type: MatchType, columns: &[Column]) -> bool {
    if filters.is_empty() {
        return true;
    }
    match match_type {
        MatchType::And => filters.iter().all(|f| check(row, f, columns)),
        MatchType::Or => filters.iter().any(|f| check(row, f, columns)),
    }
}

/// Evaluate one filter against one row.
pub fn check(row: &Row, filter: &Filter, columns: &[Column]) -> bool {
    let Some(column) = columns.iter().find(|c| c.id == filter.column) else {
        return true; // stale reference: inert, not an error
    };
    let raw = row.value(column.id);

    // Empty checks are type-independent and evaluated first.
    match filter.op {
        FilterOperator::IsEmpty => return raw.is_empty(),
        FilterOperator::IsNotEmpty => return !raw.is_empty(),
        _ => {}
    }

    match column.ty {
        ColumnType::Date => check_date(raw, filter),
        ColumnType::Number | ColumnType::Rating => check_number(raw, filter),
        _ => check_text(raw, filter),
    }
}

/// Day-granularity date comparison; time-of-day is ignored.
fn check_date(raw: &Value, filter: &Filter) -> bool {
    // An unparseable filter value never excludes data.
    let Some(wanted) = value::parse_date(&filter.value) else {
        return true;
    };
    // A row without a parseable date fails the comparison.
    let Some(have) = raw.as_date() else {
        return false;
    };
    match filter.op {
        FilterOperator::IsSame => have == wanted,
        FilterOperator::IsBefore => have < wanted,
        FilterOperator::IsAfter => have > wanted,
        _ => false,
    }
}

fn check_number(raw: &Value, filter: &Filter) -> bool {
    let Some(wanted) = filter.value.trim().parse::<f64>().ok() else {
        return true;
    };
    let Some(have) = raw.as_number() else {
        return false;
    };
    match filter.op {
        FilterOperator::Equals => have == wanted,
        FilterOperator::Gt => have > wanted,
        FilterOperator::Lt => have < wanted,
        FilterOperator::Gte => have >= wanted,
        FilterOperator::Lte => have <= wanted,
        _ => false,
    }
}

/// Case-insensitive comparison on stringified values. An operator that
/// makes no sense for text falls back to substring matching.
fn check_text(raw: &Value, filter: &Filter) -> bool {
    let have = raw.to_display().to_lowercase();
    let wanted = filter.value.to_lowercase();
    match filter.op {
        FilterOperator::DoesNotContain => !have.contains(&wanted),
        FilterOperator::Equals => have == wanted,
        _ => have.contains(&wanted),
    }
}
