//! Workspace: the full collection of sheets and folders.
//!
//! Sole owner of all sheets; relation columns hold sheet ids, never
//! references. Every mutation is a discrete, named transition through
//! `&mut Workspace`; an `Err` return means nothing changed. The tree is
//! represented through parent-id back-references on each sheet, so cycle
//! checks are an explicit ancestor walk, not pointer chasing.

use serde::{Deserialize, Serialize};

use crate::ai::SchemaCommand;
use crate::column::{Column, ColumnType};
use crate::error::EngineError;
use crate::relation::{self, LinkState};
use crate::sheet::{ColumnId, RowId, Sheet, SheetId, SheetKind};
use crate::value::Value;

fn default_next_id() -> u64 {
    1
}

/// The unit of persistence and import/export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    sheets: Vec<Sheet>,
    #[serde(default)]
    pub active_sheet: Option<SheetId>,
    /// Monotonically increasing, never reused.
    #[serde(default = "default_next_id")]
    next_sheet_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// New workspace with one empty table.
    pub fn new() -> Self {
        let sheet = Sheet::new_table(SheetId(1), "Sheet 1");
        Self {
            sheets: vec![sheet],
            active_sheet: Some(SheetId(1)),
            next_sheet_id: 2,
        }
    }

    /// Rebuild a workspace from externally sourced sheets (import, load).
    /// Refuses an empty sheet list; repairs per-sheet invariants and the
    /// id counter.
    pub fn from_sheets(mut sheets: Vec<Sheet>) -> Result<Self, EngineError> {
        if sheets.is_empty() {
            return Err(EngineError::LastSheet);
        }
        for sheet in &mut sheets {
            sheet.normalize();
        }
        let next_sheet_id = sheets.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        let active_sheet = sheets
            .iter()
            .find(|s| s.is_table())
            .or(sheets.first())
            .map(|s| s.id);
        Ok(Self {
            sheets,
            active_sheet,
            next_sheet_id,
        })
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Next sheet id (for persistence).
    pub fn next_sheet_id(&self) -> u64 {
        self.next_sheet_id
    }

    /// Restore the id counter from persistence. Never lowers it below
    /// what the loaded sheets require.
    pub fn set_next_sheet_id(&mut self, id: u64) {
        self.next_sheet_id = self.next_sheet_id.max(id);
    }

    pub fn sheet(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn index_of(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id == id)
    }

    fn alloc_sheet_id(&mut self) -> SheetId {
        let id = SheetId(self.next_sheet_id);
        self.next_sheet_id += 1;
        id
    }

    /// Direct children of a folder (or of the root when `parent` is None),
    /// in insertion order.
    pub fn children(&self, parent: Option<SheetId>) -> Vec<&Sheet> {
        self.sheets.iter().filter(|s| s.parent == parent).collect()
    }

    // -------------------------------------------------------------------------
    // Sheet lifecycle
    // -------------------------------------------------------------------------

    pub fn add_sheet(
        &mut self,
        name: impl Into<String>,
        parent: Option<SheetId>,
    ) -> Result<SheetId, EngineError> {
        self.check_parent(parent)?;
        let id = self.alloc_sheet_id();
        let mut sheet = Sheet::new_table(id, name);
        sheet.parent = parent;
        self.sheets.push(sheet);
        self.active_sheet = Some(id);
        Ok(id)
    }

    pub fn add_folder(
        &mut self,
        name: impl Into<String>,
        parent: Option<SheetId>,
    ) -> Result<SheetId, EngineError> {
        self.check_parent(parent)?;
        let id = self.alloc_sheet_id();
        let mut sheet = Sheet::new_folder(id, name);
        sheet.parent = parent;
        self.sheets.push(sheet);
        Ok(id)
    }

    pub fn add_document(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent: Option<SheetId>,
    ) -> Result<SheetId, EngineError> {
        self.check_parent(parent)?;
        let id = self.alloc_sheet_id();
        let mut sheet = Sheet::new_document(id, name, content);
        sheet.parent = parent;
        self.sheets.push(sheet);
        Ok(id)
    }

    fn check_parent(&self, parent: Option<SheetId>) -> Result<(), EngineError> {
        if let Some(p) = parent {
            let sheet = self.sheet(p).ok_or(EngineError::UnknownSheet(p))?;
            if sheet.kind != SheetKind::Folder {
                return Err(EngineError::NotAFolder(p));
            }
        }
        Ok(())
    }

    pub fn rename_sheet(&mut self, id: SheetId, name: impl Into<String>) -> Result<(), EngineError> {
        let sheet = self.sheet_mut(id).ok_or(EngineError::UnknownSheet(id))?;
        sheet.name = name.into();
        Ok(())
    }

    /// All descendants of `root`, computed via parent-id traversal.
    pub fn descendants(&self, root: SheetId) -> Vec<SheetId> {
        let mut out = Vec::new();
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for sheet in &self.sheets {
                if sheet.parent == Some(current) {
                    frontier.push(sheet.id);
                    out.push(sheet.id);
                }
            }
        }
        out
    }

    fn is_ancestor(&self, maybe_ancestor: SheetId, of: SheetId) -> bool {
        let mut current = self.sheet(of).and_then(|s| s.parent);
        while let Some(id) = current {
            if id == maybe_ancestor {
                return true;
            }
            current = self.sheet(id).and_then(|s| s.parent);
        }
        false
    }

    /// Delete a sheet and, recursively, everything under it. Refused when
    /// it would empty the workspace. Mirror columns on other sheets that
    /// pointed here are left as-is (they become Orphaned).
    pub fn delete_sheet(&mut self, id: SheetId) -> Result<(), EngineError> {
        if self.sheet(id).is_none() {
            return Err(EngineError::UnknownSheet(id));
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        if doomed.len() == self.sheets.len() {
            return Err(EngineError::LastSheet);
        }
        self.sheets.retain(|s| !doomed.contains(&s.id));
        if self.active_sheet.map(|a| doomed.contains(&a)).unwrap_or(false) {
            self.active_sheet = self.sheets.iter().find(|s| s.is_table()).map(|s| s.id);
        }
        Ok(())
    }

    /// Re-parent a sheet. The ancestor walk runs before any mutation and
    /// rejects a move that would put a folder inside its own descendant.
    pub fn move_sheet(&mut self, id: SheetId, new_parent: Option<SheetId>) -> Result<(), EngineError> {
        if self.sheet(id).is_none() {
            return Err(EngineError::UnknownSheet(id));
        }
        if let Some(p) = new_parent {
            if p == id || self.is_ancestor(id, p) {
                return Err(EngineError::CycleMove);
            }
        }
        self.check_parent(new_parent)?;
        let sheet = self.sheet_mut(id).ok_or(EngineError::UnknownSheet(id))?;
        sheet.parent = new_parent;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Cell writes
    // -------------------------------------------------------------------------

    /// Write a cell through the workspace so relation edits keep their
    /// mirror in sync. Non-relation columns behave exactly like
    /// `Sheet::set_cell`.
    pub fn set_cell(
        &mut self,
        sheet_id: SheetId,
        row: RowId,
        column: ColumnId,
        value: Value,
    ) -> Result<(), EngineError> {
        let sheet = self.sheet(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
        let col = sheet.column(column).ok_or(EngineError::UnknownColumn(column))?;
        if col.ty == ColumnType::Relation {
            let selected = match value {
                Value::Links(ids) => ids,
                v if v.is_empty() => Vec::new(),
                _ => return Err(EngineError::NotARelation(column)),
            };
            return self.set_relation_cell(sheet_id, row, column, selected);
        }
        let sheet = self.sheet_mut(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
        sheet.set_cell(row, column, value)
    }

    // -------------------------------------------------------------------------
    // Relations
    // -------------------------------------------------------------------------

    /// Create a relation column on `sheet_id` targeting `target`, and
    /// locate or create the mirror back-link on the target sheet. An
    /// existing relation column on the target pointing back here is
    /// reused rather than duplicated. A self-relation is its own mirror.
    pub fn add_relation_column(
        &mut self,
        sheet_id: SheetId,
        label: impl Into<String>,
        target: SheetId,
    ) -> Result<ColumnId, EngineError> {
        let src = self.index_of(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
        let tgt = self.index_of(target).ok_or(EngineError::UnknownSheet(target))?;
        if !self.sheets[src].is_table() {
            return Err(EngineError::NotATable(sheet_id));
        }
        if !self.sheets[tgt].is_table() {
            return Err(EngineError::NotATable(target));
        }
        let source_name = self.sheets[src].name.clone();

        let source = &mut self.sheets[src];
        let id = source.alloc_column_id();
        source.insert_column(Column::new(id, label, ColumnType::Relation).with_relation(target));

        if src != tgt {
            relation::ensure_back_link(&mut self.sheets[tgt], sheet_id, &source_name);
        }
        Ok(id)
    }

    /// The Edit-cell transition: write the forward link list, then apply
    /// the idempotent mirror diff on the target sheet. When the target
    /// sheet or mirror column is missing, the forward value is still
    /// written and the mirror step is silently skipped (recoverable,
    /// local, never fatal).
    pub fn set_relation_cell(
        &mut self,
        sheet_id: SheetId,
        row: RowId,
        column: ColumnId,
        selected: Vec<RowId>,
    ) -> Result<(), EngineError> {
        let src = self.index_of(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
        let col = self.sheets[src]
            .column(column)
            .ok_or(EngineError::UnknownColumn(column))?;
        let target = col.relation.ok_or(EngineError::NotARelation(column))?.target_sheet;

        // Phase 1: forward write on the source sheet.
        self.sheets[src].set_cell(row, column, Value::Links(selected.clone()))?;

        // Phase 2: mirror diff on the target sheet.
        let Some(tgt) = self.index_of(target) else {
            return Ok(()); // target sheet gone: orphaned, skip
        };
        let Some(back) = relation::find_back_link(&self.sheets[tgt], sheet_id) else {
            return Ok(()); // mirror column gone: orphaned, skip
        };
        if tgt == src && back == column {
            return Ok(()); // self-relation: the forward column is the mirror
        }
        relation::apply_link_diff(&mut self.sheets[tgt], back, row, &selected);
        Ok(())
    }

    /// Lifecycle state of one relation column.
    pub fn relation_state(&self, sheet_id: SheetId, column: ColumnId) -> LinkState {
        let Some(col) = self.sheet(sheet_id).and_then(|s| s.column(column)) else {
            return LinkState::Unlinked;
        };
        let Some(rel) = col.relation else {
            return LinkState::Unlinked;
        };
        match self.sheet(rel.target_sheet) {
            Some(target) if relation::find_back_link(target, sheet_id).is_some() => LinkState::Linked,
            _ => LinkState::Orphaned,
        }
    }

    /// Relation columns whose target sheet or mirror column is missing.
    /// Diagnostic only; the engine performs no automatic cleanup.
    pub fn orphaned_relation_columns(&self) -> Vec<(SheetId, ColumnId)> {
        let mut out = Vec::new();
        for sheet in &self.sheets {
            for col in sheet.columns() {
                if col.relation.is_some()
                    && self.relation_state(sheet.id, col.id) == LinkState::Orphaned
                {
                    out.push((sheet.id, col.id));
                }
            }
        }
        out
    }

    // -------------------------------------------------------------------------
    // AI collaborator results
    // -------------------------------------------------------------------------

    /// Append generated rows, assigning fresh ids and re-coercing every
    /// value through the owning column's type. Cells for columns the
    /// sheet does not have are skipped.
    pub fn apply_generated_rows(
        &mut self,
        sheet_id: SheetId,
        rows: Vec<Vec<(ColumnId, Value)>>,
    ) -> Result<Vec<RowId>, EngineError> {
        let sheet = self.sheet_mut(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
        if !sheet.is_table() {
            return Err(EngineError::NotATable(sheet_id));
        }
        let mut ids = Vec::with_capacity(rows.len());
        for cells in rows {
            let id = sheet.add_row();
            for (column, value) in cells {
                if sheet.column(column).is_some() {
                    sheet.set_cell(id, column, value)?;
                }
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Map a schema command onto column operations. Columns are addressed
    /// by display label; an unknown label is a refusal, not a partial
    /// apply. Returns the assistant's prose for `Reply`.
    pub fn apply_schema_command(
        &mut self,
        sheet_id: SheetId,
        command: SchemaCommand,
    ) -> Result<Option<String>, EngineError> {
        match command {
            SchemaCommand::Reply { text } => Ok(Some(text)),
            SchemaCommand::AddColumn { label, ty } => {
                if ty == ColumnType::Relation {
                    // Relations need a target sheet; not expressible here
                    return Err(EngineError::Unsupported("add relation column via schema command"));
                }
                let sheet = self.sheet_mut(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
                if !sheet.is_table() {
                    return Err(EngineError::NotATable(sheet_id));
                }
                sheet.add_column(label, ty);
                Ok(None)
            }
            SchemaCommand::DeleteColumn { label } => {
                let sheet = self.sheet_mut(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
                let id = sheet
                    .column_by_label(&label)
                    .map(|c| c.id)
                    .ok_or(EngineError::UnknownLabel(label))?;
                sheet.delete_column(id)?;
                Ok(None)
            }
            SchemaCommand::RenameColumn { from, to } => {
                let sheet = self.sheet_mut(sheet_id).ok_or(EngineError::UnknownSheet(sheet_id))?;
                let id = sheet
                    .column_by_label(&from)
                    .map(|c| c.id)
                    .ok_or(EngineError::UnknownLabel(from))?;
                sheet.rename_column(id, to)?;
                Ok(None)
            }
        }
    }
}
