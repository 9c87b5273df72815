//! Column type model.
//!
//! A column's type fully determines which filter operators are legal, how
//! raw values are coerced on write, and what a freshly created row holds.
//! The type set is closed: an unknown type is unrepresentable, so there is
//! no runtime "unknown type" path to recover from.

use serde::{Deserialize, Serialize};

use crate::sheet::{ColumnId, SheetId};
use crate::value::Value;

/// Filter operators across all column types. Legality per type comes from
/// [`ColumnType::operators`]; the evaluator treats illegal combinations as
/// the type's fallback (see filter module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    DoesNotContain,
    Equals,
    Gt,
    Lt,
    Gte,
    Lte,
    IsSame,
    IsBefore,
    IsAfter,
    IsEmpty,
    IsNotEmpty,
}

/// The closed set of column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Select,
    Date,
    Checkbox,
    Url,
    Rating,
    Image,
    File,
    Person,
    Phone,
    Email,
    Location,
    Relation,
}

impl ColumnType {
    /// Legal filter operators for this type.
    pub fn operators(&self) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match self {
            ColumnType::Date => &[IsSame, IsBefore, IsAfter, IsEmpty, IsNotEmpty],
            ColumnType::Number | ColumnType::Rating => {
                &[Equals, Gt, Lt, Gte, Lte, IsEmpty, IsNotEmpty]
            }
            ColumnType::Checkbox => &[Equals, IsEmpty, IsNotEmpty],
            _ => &[Contains, DoesNotContain, Equals, IsEmpty, IsNotEmpty],
        }
    }

    /// Value placed in a newly created row.
    pub fn default_value(&self) -> Value {
        match self {
            ColumnType::Checkbox => Value::Bool(false),
            ColumnType::Relation => Value::Links(Vec::new()),
            _ => Value::Empty,
        }
    }

    /// Normalize a raw value into this type's stored shape. Applied on
    /// every cell write so evaluators can pattern-match without sniffing.
    pub fn coerce(&self, raw: Value) -> Value {
        if raw.is_empty() {
            return self.default_value();
        }
        match self {
            ColumnType::Number | ColumnType::Rating => match raw.as_number() {
                Some(n) => Value::Number(n),
                None => Value::Empty,
            },
            ColumnType::Checkbox => match raw {
                Value::Bool(b) => Value::Bool(b),
                Value::Number(n) => Value::Bool(n != 0.0),
                Value::Text(s) => {
                    let s = s.trim().to_lowercase();
                    Value::Bool(s == "true" || s == "1" || s == "yes")
                }
                _ => Value::Bool(false),
            },
            ColumnType::Date => match raw.as_date() {
                Some(d) => Value::Date(d.format("%Y-%m-%d").to_string()),
                None => Value::Empty,
            },
            ColumnType::Relation => match raw {
                Value::Links(ids) => Value::Links(ids),
                _ => Value::Links(Vec::new()),
            },
            // Text-backed types store the stringified form.
            _ => Value::Text(raw.to_display()),
        }
    }
}

/// One choice of a select column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub color: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Configuration carried only by relation columns: a reference (never
/// ownership) to the target sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationConfig {
    pub target_sheet: SheetId,
}

/// A typed column. Id is unique within its sheet; the label is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub label: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    /// Ordered choices, present only for select columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Present only for relation columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationConfig>,
}

impl Column {
    pub fn new(id: ColumnId, label: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            id,
            label: label.into(),
            ty,
            options: Vec::new(),
            relation: None,
        }
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_relation(mut self, target_sheet: SheetId) -> Self {
        self.relation = Some(RelationConfig { target_sheet });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tables() {
        assert!(ColumnType::Date.operators().contains(&FilterOperator::IsBefore));
        assert!(!ColumnType::Date.operators().contains(&FilterOperator::Contains));
        assert!(ColumnType::Rating.operators().contains(&FilterOperator::Gte));
        assert!(ColumnType::Text.operators().contains(&FilterOperator::DoesNotContain));
        // Empty checks are legal for every type
        for ty in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Select,
            ColumnType::Date,
            ColumnType::Checkbox,
            ColumnType::Relation,
        ] {
            assert!(ty.operators().contains(&FilterOperator::IsEmpty));
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(
            ColumnType::Number.coerce(Value::Text("42".into())),
            Value::Number(42.0)
        );
        assert_eq!(ColumnType::Number.coerce(Value::Text("abc".into())), Value::Empty);
        assert_eq!(ColumnType::Number.coerce(Value::Empty), Value::Empty);
    }

    #[test]
    fn test_coerce_checkbox() {
        assert_eq!(
            ColumnType::Checkbox.coerce(Value::Text("Yes".into())),
            Value::Bool(true)
        );
        assert_eq!(
            ColumnType::Checkbox.coerce(Value::Text("nope".into())),
            Value::Bool(false)
        );
        // Blank resets to the type default, not Empty
        assert_eq!(ColumnType::Checkbox.coerce(Value::Empty), Value::Bool(false));
    }

    #[test]
    fn test_coerce_date_normalizes() {
        assert_eq!(
            ColumnType::Date.coerce(Value::Text("2024-05-01T12:00:00".into())),
            Value::Date("2024-05-01".into())
        );
        assert_eq!(ColumnType::Date.coerce(Value::Text("soon".into())), Value::Empty);
    }

    #[test]
    fn test_coerce_text_stringifies() {
        assert_eq!(
            ColumnType::Text.coerce(Value::Number(7.0)),
            Value::Text("7".into())
        );
    }
}
