//! Sheet model: typed columns, rows, views, selection.
//!
//! A sheet exclusively owns its columns, rows, and views. Ids are opaque
//! newtypes allocated from per-sheet monotonic counters that are never
//! reused. Rows are independent of view state; the same row backs every
//! view of its sheet.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnType, SelectOption};
use crate::error::EngineError;
use crate::value::Value;
use crate::view::{Filter, MatchType, RowHeight, SortRule, View, ViewLayout};

/// Workspace-unique sheet id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetId(pub u64);

/// Column id, unique within its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub u64);

/// Row id, unique within its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

/// View id, unique within its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

/// A row: id plus a sparse mapping from column id to value.
/// A missing entry reads as `Value::Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default, with = "cell_map")]
    pub cells: FxHashMap<ColumnId, Value>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: FxHashMap::default(),
        }
    }

    /// Value for a column, `Empty` if absent.
    pub fn value(&self, column: ColumnId) -> &Value {
        static EMPTY: Value = Value::Empty;
        self.cells.get(&column).unwrap_or(&EMPTY)
    }

    /// Store a value; `Empty` removes the entry to keep rows sparse.
    pub fn set(&mut self, column: ColumnId, value: Value) {
        if value == Value::Empty {
            self.cells.remove(&column);
        } else {
            self.cells.insert(column, value);
        }
    }
}

/// What kind of node this sheet is in the workspace tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    #[default]
    Table,
    /// Container only: no columns/rows/views.
    Folder,
    /// Opaque content blob, no tabular data.
    Document,
}

fn default_next_id() -> u64 {
    1
}

/// A sheet: an ordered list of columns, an unordered list of rows, an
/// ordered list of views, plus transient selection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    #[serde(default)]
    pub kind: SheetKind,
    /// Parent folder, None at the workspace root.
    #[serde(default)]
    pub parent: Option<SheetId>,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default)]
    views: Vec<View>,
    #[serde(default)]
    pub active_view: Option<ViewId>,
    /// Selected row ids. UI state, not business data, but persisted
    /// (as an ordered list) so a reload restores the selection.
    #[serde(default, with = "ordered_id_set")]
    pub selected_rows: FxHashSet<RowId>,
    /// Document content blob; empty for tables and folders.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default = "default_next_id")]
    next_column_id: u64,
    #[serde(default = "default_next_id")]
    next_row_id: u64,
    #[serde(default = "default_next_id")]
    next_view_id: u64,
    #[serde(default = "default_next_id")]
    next_option_id: u64,
}

impl Sheet {
    /// New table sheet with its mandatory first view.
    pub fn new_table(id: SheetId, name: impl Into<String>) -> Self {
        let mut sheet = Self {
            id,
            name: name.into(),
            kind: SheetKind::Table,
            parent: None,
            columns: Vec::new(),
            rows: Vec::new(),
            views: Vec::new(),
            active_view: None,
            selected_rows: FxHashSet::default(),
            content: String::new(),
            next_column_id: 1,
            next_row_id: 1,
            next_view_id: 1,
            next_option_id: 1,
        };
        let view = sheet.add_view("Grid", ViewLayout::Grid);
        sheet.active_view = Some(view);
        sheet
    }

    pub fn new_folder(id: SheetId, name: impl Into<String>) -> Self {
        let mut sheet = Self::new_table(id, name);
        sheet.kind = SheetKind::Folder;
        sheet.views.clear();
        sheet.active_view = None;
        sheet
    }

    pub fn new_document(id: SheetId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut sheet = Self::new_folder(id, name);
        sheet.kind = SheetKind::Document;
        sheet.content = content.into();
        sheet
    }

    pub fn is_table(&self) -> bool {
        self.kind == SheetKind::Table
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    /// Find a column by its display label (labels are not unique;
    /// first match wins).
    pub fn column_by_label(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    pub(crate) fn alloc_column_id(&mut self) -> ColumnId {
        let id = ColumnId(self.next_column_id);
        self.next_column_id += 1;
        id
    }

    /// Append a fully built column and seed its default value into
    /// existing rows (sparse: only non-Empty defaults are stored).
    pub(crate) fn insert_column(&mut self, column: Column) {
        let default = column.ty.default_value();
        if default != Value::Empty {
            for row in &mut self.rows {
                row.cells.entry(column.id).or_insert_with(|| default.clone());
            }
        }
        self.columns.push(column);
    }

    pub fn add_column(&mut self, label: impl Into<String>, ty: ColumnType) -> ColumnId {
        let id = self.alloc_column_id();
        self.insert_column(Column::new(id, label, ty));
        id
    }

    pub fn rename_column(&mut self, id: ColumnId, label: impl Into<String>) -> Result<(), EngineError> {
        let column = self.column_mut(id).ok_or(EngineError::UnknownColumn(id))?;
        column.label = label.into();
        Ok(())
    }

    /// Delete a column and cascade: cell values are dropped, and every
    /// view forgets the column (filters, sort, group, hidden list).
    /// A paired relation mirror on another sheet is deliberately left
    /// untouched (see relation module).
    pub fn delete_column(&mut self, id: ColumnId) -> Result<(), EngineError> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or(EngineError::UnknownColumn(id))?;
        self.columns.remove(index);
        for row in &mut self.rows {
            row.cells.remove(&id);
        }
        for view in &mut self.views {
            view.forget_column(id);
        }
        Ok(())
    }

    /// Index-based reorder: move the column to `to` (clamped).
    pub fn move_column(&mut self, id: ColumnId, to: usize) -> Result<(), EngineError> {
        let from = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or(EngineError::UnknownColumn(id))?;
        let column = self.columns.remove(from);
        let to = to.min(self.columns.len());
        self.columns.insert(to, column);
        Ok(())
    }

    /// Append a choice to a select column. Returns the new option id.
    pub fn add_select_option(
        &mut self,
        column: ColumnId,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<String, EngineError> {
        let option_id = format!("opt{}", self.next_option_id);
        self.next_option_id += 1;
        let col = self.column_mut(column).ok_or(EngineError::UnknownColumn(column))?;
        col.options.push(SelectOption::new(option_id.clone(), label, color));
        Ok(option_id)
    }

    /// Remove a choice; cells holding its label are blanked.
    pub fn remove_select_option(&mut self, column: ColumnId, option_id: &str) -> Result<(), EngineError> {
        let col = self.column_mut(column).ok_or(EngineError::UnknownColumn(column))?;
        let Some(index) = col.options.iter().position(|o| o.id == option_id) else {
            return Ok(()); // already gone
        };
        let label = col.options.remove(index).label;
        for row in &mut self.rows {
            if row.value(column).to_display() == label {
                row.set(column, Value::Empty);
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn alloc_row_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        id
    }

    /// Append a fresh row seeded with per-type defaults.
    pub fn add_row(&mut self) -> RowId {
        let id = self.alloc_row_id();
        let mut row = Row::new(id);
        for column in &self.columns {
            let default = column.ty.default_value();
            if default != Value::Empty {
                row.cells.insert(column.id, default);
            }
        }
        self.rows.push(row);
        id
    }

    pub fn delete_row(&mut self, id: RowId) -> Result<(), EngineError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::UnknownRow(id))?;
        self.rows.remove(index);
        self.selected_rows.remove(&id);
        Ok(())
    }

    /// Clone a row's cells under a fresh id, inserted after the original.
    pub fn duplicate_row(&mut self, id: RowId) -> Result<RowId, EngineError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::UnknownRow(id))?;
        let new_id = self.alloc_row_id();
        let mut copy = self.rows[index].clone();
        copy.id = new_id;
        self.rows.insert(index + 1, copy);
        Ok(new_id)
    }

    /// Index-based reorder: move the row to `to` (clamped).
    pub fn move_row(&mut self, id: RowId, to: usize) -> Result<(), EngineError> {
        let from = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::UnknownRow(id))?;
        let row = self.rows.remove(from);
        let to = to.min(self.rows.len());
        self.rows.insert(to, row);
        Ok(())
    }

    /// Write a cell, coercing the raw value into the column's stored
    /// shape. Relation cells written here do NOT update the mirror side;
    /// use `Workspace::set_relation_cell` for that.
    pub fn set_cell(&mut self, row: RowId, column: ColumnId, raw: Value) -> Result<(), EngineError> {
        let ty = self
            .column(column)
            .map(|c| c.ty)
            .ok_or(EngineError::UnknownColumn(column))?;
        let value = ty.coerce(raw);
        let row = self.row_mut(row).ok_or(EngineError::UnknownRow(row))?;
        row.set(column, value);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    pub fn active_view(&self) -> Option<&View> {
        self.active_view.and_then(|id| self.view(id))
    }

    pub fn add_view(&mut self, name: impl Into<String>, layout: ViewLayout) -> ViewId {
        let id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        self.views.push(View::new(id, name, layout));
        id
    }

    /// Deleting the last view is refused: every table keeps at least one.
    pub fn delete_view(&mut self, id: ViewId) -> Result<(), EngineError> {
        let index = self
            .views
            .iter()
            .position(|v| v.id == id)
            .ok_or(EngineError::UnknownView(id))?;
        if self.views.len() == 1 {
            return Err(EngineError::LastView);
        }
        self.views.remove(index);
        if self.active_view == Some(id) {
            self.active_view = self.views.first().map(|v| v.id);
        }
        Ok(())
    }

    pub fn duplicate_view(&mut self, id: ViewId) -> Result<ViewId, EngineError> {
        let source = self.view(id).cloned().ok_or(EngineError::UnknownView(id))?;
        let new_id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        let mut copy = source;
        copy.id = new_id;
        copy.name = format!("{} copy", copy.name);
        self.views.push(copy);
        Ok(new_id)
    }

    pub fn set_active_view(&mut self, id: ViewId) -> Result<(), EngineError> {
        if self.view(id).is_none() {
            return Err(EngineError::UnknownView(id));
        }
        self.active_view = Some(id);
        Ok(())
    }

    // View config setters: thin, but they keep the renderer out of the
    // view internals.

    pub fn set_filters(&mut self, view: ViewId, filters: Vec<Filter>) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.filters = filters;
        Ok(())
    }

    pub fn set_match_type(&mut self, view: ViewId, match_type: MatchType) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.match_type = match_type;
        Ok(())
    }

    /// Replaces (never composes with) any previous rule.
    pub fn set_sort(&mut self, view: ViewId, sort: Option<SortRule>) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.sort = sort;
        Ok(())
    }

    pub fn set_group_by(&mut self, view: ViewId, group_by: Option<ColumnId>) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.group_by = group_by;
        Ok(())
    }

    pub fn set_row_height(&mut self, view: ViewId, row_height: RowHeight) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.row_height = row_height;
        Ok(())
    }

    pub fn hide_column(&mut self, view: ViewId, column: ColumnId) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        if !v.config.hidden_columns.contains(&column) {
            v.config.hidden_columns.push(column);
        }
        Ok(())
    }

    pub fn show_column(&mut self, view: ViewId, column: ColumnId) -> Result<(), EngineError> {
        let v = self.view_mut(view).ok_or(EngineError::UnknownView(view))?;
        v.config.hidden_columns.retain(|&c| c != column);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn select_row(&mut self, id: RowId) -> Result<(), EngineError> {
        if self.row(id).is_none() {
            return Err(EngineError::UnknownRow(id));
        }
        self.selected_rows.insert(id);
        Ok(())
    }

    pub fn deselect_row(&mut self, id: RowId) {
        self.selected_rows.remove(&id);
    }

    pub fn toggle_row_selection(&mut self, id: RowId) -> Result<bool, EngineError> {
        if self.row(id).is_none() {
            return Err(EngineError::UnknownRow(id));
        }
        if self.selected_rows.remove(&id) {
            Ok(false)
        } else {
            self.selected_rows.insert(id);
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_rows.clear();
    }

    // -------------------------------------------------------------------------
    // Repair (used after import)
    // -------------------------------------------------------------------------

    /// Restore structural invariants on externally sourced data: id
    /// counters above every existing id, at least one view per table,
    /// a valid active view.
    pub fn normalize(&mut self) {
        let max_col = self.columns.iter().map(|c| c.id.0).max().unwrap_or(0);
        let max_row = self.rows.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_view = self.views.iter().map(|v| v.id.0).max().unwrap_or(0);
        self.next_column_id = self.next_column_id.max(max_col + 1);
        self.next_row_id = self.next_row_id.max(max_row + 1);
        self.next_view_id = self.next_view_id.max(max_view + 1);

        if self.is_table() {
            if self.views.is_empty() {
                let id = self.add_view("Grid", ViewLayout::Grid);
                self.active_view = Some(id);
            }
            let valid = self.active_view.map(|id| self.view(id).is_some()).unwrap_or(false);
            if !valid {
                self.active_view = self.views.first().map(|v| v.id);
            }
        } else {
            self.views.clear();
            self.active_view = None;
        }

        let known: Vec<RowId> = self.rows.iter().map(|r| r.id).collect();
        self.selected_rows.retain(|id| known.contains(id));
    }
}

/// Serialize row cells as a JSON object with stringified column ids,
/// sorted for a deterministic export.
mod cell_map {
    use std::collections::BTreeMap;

    use rustc_hash::FxHashMap;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ColumnId;
    use crate::value::Value;

    pub fn serialize<S>(cells: &FxHashMap<ColumnId, Value>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<(&ColumnId, &Value)> = cells.iter().collect();
        entries.sort_by_key(|(id, _)| id.0);
        let mut map = ser.serialize_map(Some(entries.len()))?;
        for (id, value) in entries {
            map.serialize_entry(&id.0.to_string(), value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(de: D) -> Result<FxHashMap<ColumnId, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, Value> = BTreeMap::deserialize(de)?;
        raw.into_iter()
            .map(|(key, value)| {
                key.parse::<u64>()
                    .map(|n| (ColumnId(n), value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

/// Selected rows persist as an ordered id list (set -> sorted array on
/// save, array -> set on load).
mod ordered_id_set {
    use rustc_hash::FxHashSet;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::RowId;

    pub fn serialize<S>(set: &FxHashSet<RowId>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ids: Vec<u64> = set.iter().map(|r| r.0).collect();
        ids.sort_unstable();
        ids.serialize(ser)
    }

    pub fn deserialize<'de, D>(de: D) -> Result<FxHashSet<RowId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Vec::<u64>::deserialize(de)?;
        Ok(ids.into_iter().map(RowId).collect())
    }
}
