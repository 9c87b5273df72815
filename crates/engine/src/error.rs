//! Engine error type.
//!
//! Every refusal happens BEFORE any mutation: an `Err` return guarantees
//! the workspace is unchanged. Stale references and unparseable values are
//! not errors (they resolve to inert/no-op behavior in the evaluators).

use std::fmt;

use crate::sheet::{ColumnId, RowId, SheetId, ViewId};

/// Reasons an engine operation can be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No sheet with this id in the workspace.
    UnknownSheet(SheetId),
    /// No column with this id on the sheet.
    UnknownColumn(ColumnId),
    /// No row with this id on the sheet.
    UnknownRow(RowId),
    /// No view with this id on the sheet.
    UnknownView(ViewId),
    /// Operation requires a table sheet (not a folder or document).
    NotATable(SheetId),
    /// The column is not a relation column.
    NotARelation(ColumnId),
    /// A sheet must keep at least one view.
    LastView,
    /// A workspace must keep at least one sheet.
    LastSheet,
    /// Moving a folder into its own descendant would create a cycle.
    CycleMove,
    /// Move target exists but is not a folder.
    NotAFolder(SheetId),
    /// No column matched the given display label (schema commands).
    UnknownLabel(String),
    /// The operation is not expressible through this entry point.
    Unsupported(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownSheet(id) => write!(f, "unknown sheet {}", id.0),
            EngineError::UnknownColumn(id) => write!(f, "unknown column {}", id.0),
            EngineError::UnknownRow(id) => write!(f, "unknown row {}", id.0),
            EngineError::UnknownView(id) => write!(f, "unknown view {}", id.0),
            EngineError::NotATable(id) => write!(f, "sheet {} is not a table", id.0),
            EngineError::NotARelation(id) => write!(f, "column {} is not a relation", id.0),
            EngineError::LastView => write!(f, "a sheet must keep at least one view"),
            EngineError::LastSheet => write!(f, "a workspace must keep at least one sheet"),
            EngineError::CycleMove => write!(f, "cannot move a folder into its own descendant"),
            EngineError::NotAFolder(id) => write!(f, "sheet {} is not a folder", id.0),
            EngineError::UnknownLabel(label) => write!(f, "no column labeled '{}'", label),
            EngineError::Unsupported(what) => write!(f, "unsupported operation: {}", what),
        }
    }
}

impl std::error::Error for EngineError {}
