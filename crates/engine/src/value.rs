//! Tagged cell values.
//!
//! Every cell stores a `Value` whose variant is determined by the owning
//! column's type. Filter, sort, and group logic pattern-match on the
//! variant instead of sniffing stringly-typed data at runtime.
//!
//! Coercion helpers are deliberately lossy in one direction only:
//! `as_number`/`as_date` answer "can this be compared as X?", they never
//! mutate the stored value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sheet::RowId;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// No value. A row with no entry for a column reads as `Empty`.
    Empty,
    /// Free text. Also the stored form for select labels, urls, emails,
    /// phone numbers, people, locations, and file/image references.
    Text(String),
    /// Numeric (also ratings).
    Number(f64),
    /// Checkbox.
    Bool(bool),
    /// Calendar date as an ISO `yyyy-mm-dd` string.
    Date(String),
    /// Ordered row ids in another sheet (relation columns).
    Links(Vec<RowId>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Empty
    }
}

impl Value {
    /// True for `Empty`, the empty string, and an empty link list.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            Value::Links(ids) => ids.is_empty(),
            _ => false,
        }
    }

    /// Stringified form used by search, grouping, and the default filter
    /// comparison. Whole numbers render without a trailing `.0`.
    pub fn to_display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Date(s) => s.clone(),
            Value::Links(ids) => ids
                .iter()
                .map(|id| id.0.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Numeric coercion: numbers as-is, numeric text parsed, booleans as
    /// 0/1. Everything else (including blank text) is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Day-granularity date coercion. Text is accepted so that a date
    /// typed into a text column still compares as a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(s) | Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Link list view; non-relation values read as no links.
    pub fn links(&self) -> &[RowId] {
        match self {
            Value::Links(ids) => ids,
            _ => &[],
        }
    }
}

/// Parse an ISO date, tolerating a trailing time component
/// (`2024-05-01T09:30:00` and `2024-05-01 09:30` both parse as the day).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let date_part = s.split(|c| c == 'T' || c == ' ').next().unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
