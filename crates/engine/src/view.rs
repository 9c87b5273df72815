//! View configuration types.
//!
//! A view is a saved presentation lens over one sheet's rows: filters,
//! one optional sort rule, optional grouping, hidden columns, row height.
//! Views never hold row data; the pipeline recomputes visibility from the
//! sheet on demand.

use serde::{Deserialize, Serialize};

use crate::column::FilterOperator;
use crate::sheet::{ColumnId, ViewId};

/// How multiple filters combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    #[default]
    And,
    Or,
}

/// One filter condition. The value is kept as entered (a string); the
/// evaluator coerces it per the column's type at check time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: u64,
    pub column: ColumnId,
    pub op: FilterOperator,
    #[serde(default)]
    pub value: String,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The single active sort rule. Applying a new rule replaces the old one;
/// rules never compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRule {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// Row display height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowHeight {
    #[default]
    Short,
    Medium,
    Tall,
}

/// View layout family. Purely presentational; the pipeline is identical
/// for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLayout {
    #[default]
    Grid,
    Kanban,
    Gallery,
}

/// Per-view configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub filters: Vec<Filter>,
    pub match_type: MatchType,
    pub sort: Option<SortRule>,
    pub group_by: Option<ColumnId>,
    pub hidden_columns: Vec<ColumnId>,
    pub row_height: RowHeight,
}

/// A saved view, scoped to one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: ViewId,
    pub name: String,
    #[serde(default)]
    pub layout: ViewLayout,
    #[serde(default)]
    pub config: ViewConfig,
}

impl View {
    pub fn new(id: ViewId, name: impl Into<String>, layout: ViewLayout) -> Self {
        Self {
            id,
            name: name.into(),
            layout,
            config: ViewConfig::default(),
        }
    }

    /// Drop every config reference to a column (filters, sort, group,
    /// hidden list). Called from the column-deletion cascade.
    pub fn forget_column(&mut self, column: ColumnId) {
        self.config.filters.retain(|f| f.column != column);
        if self.config.sort.map(|s| s.column) == Some(column) {
            self.config.sort = None;
        }
        if self.config.group_by == Some(column) {
            self.config.group_by = None;
        }
        self.config.hidden_columns.retain(|&c| c != column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::FilterOperator;

    #[test]
    fn test_forget_column_strips_all_references() {
        let col = ColumnId(7);
        let other = ColumnId(8);
        let mut view = View::new(ViewId(1), "Grid", ViewLayout::Grid);
        view.config.filters = vec![
            Filter { id: 1, column: col, op: FilterOperator::Equals, value: "x".into() },
            Filter { id: 2, column: other, op: FilterOperator::Contains, value: "y".into() },
        ];
        view.config.sort = Some(SortRule { column: col, direction: SortDirection::Ascending });
        view.config.group_by = Some(col);
        view.config.hidden_columns = vec![col, other];

        view.forget_column(col);

        assert_eq!(view.config.filters.len(), 1);
        assert_eq!(view.config.filters[0].column, other);
        assert_eq!(view.config.sort, None);
        assert_eq!(view.config.group_by, None);
        assert_eq!(view.config.hidden_columns, vec![other]);
    }

    #[test]
    fn test_forget_column_leaves_unrelated_config() {
        let mut view = View::new(ViewId(1), "Grid", ViewLayout::Grid);
        view.config.sort = Some(SortRule { column: ColumnId(2), direction: SortDirection::Descending });
        view.forget_column(ColumnId(9));
        assert!(view.config.sort.is_some());
    }
}
