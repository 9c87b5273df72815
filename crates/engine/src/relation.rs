//! Relation linker.
//!
//! A relation column on sheet A (targeting sheet B) is paired with a
//! back-link column on B (targeting A). While both sides exist, the link
//! sets mirror each other exactly:
//!
//! ```text
//! T.id in R[forward]  <=>  R.id in T[back]
//! ```
//!
//! Mirror maintenance goes through an explicit diff applied to the target
//! sheet's plain cell storage, never back through the forward-edit entry
//! point, so a mirror write cannot re-trigger itself.
//!
//! Deleting the forward column or either sheet leaves the mirror in place
//! (the Orphaned state). The engine reports orphans but does not clean
//! them up; see `Workspace::orphaned_relation_columns`.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnType};
use crate::sheet::{ColumnId, RowId, Sheet, SheetId};
use crate::value::Value;

/// Lifecycle state of a relation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// No relation column exists.
    Unlinked,
    /// Forward column and mirror back-link both exist.
    Linked,
    /// Forward column exists but the target sheet or mirror is missing.
    Orphaned,
}

/// Find an existing relation column on `target` that points back at
/// `source`. First match wins; a reused mirror is shared by every forward
/// column from the same source sheet.
pub fn find_back_link(target: &Sheet, source: SheetId) -> Option<ColumnId> {
    target
        .columns()
        .iter()
        .find(|c| c.relation.map(|r| r.target_sheet) == Some(source))
        .map(|c| c.id)
}

/// Locate or create the mirror column on `target`. A freshly created
/// mirror is labeled after the source sheet's name.
pub(crate) fn ensure_back_link(target: &mut Sheet, source: SheetId, source_name: &str) -> ColumnId {
    if let Some(id) = find_back_link(target, source) {
        return id;
    }
    let id = target.alloc_column_id();
    let column = Column::new(id, source_name, ColumnType::Relation).with_relation(source);
    target.insert_column(column);
    id
}

/// Apply the mirror side of an edit: row `source_row` on the source sheet
/// selected exactly `selected` target rows. For every target row T:
///
/// - selected and not yet linked  -> append `source_row` to T's back-links
/// - not selected but linked      -> remove `source_row` from T's back-links
/// - otherwise                    -> no-op
///
/// Idempotent: re-applying the same selection changes nothing.
pub(crate) fn apply_link_diff(
    target: &mut Sheet,
    back_column: ColumnId,
    source_row: RowId,
    selected: &[RowId],
) {
    for row in target.rows_mut() {
        let is_selected = selected.contains(&row.id);
        let links = row.value(back_column).links();
        let is_linked = links.contains(&source_row);
        if is_selected == is_linked {
            continue;
        }
        let mut links = links.to_vec();
        if is_selected {
            links.push(source_row);
        } else {
            links.retain(|&id| id != source_row);
        }
        row.set(back_column, Value::Links(links));
    }
}
