// JSON import/export
//
// The interchange shape is a JSON array of sheets; selected rows
// serialize as a plain ordered array of ids (the engine's serde does
// that). Import is atomic: a malformed payload rejects the whole import,
// no partial workspace replacement.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use gridbase_engine::sheet::Sheet;
use gridbase_engine::workspace::Workspace;

/// Export the workspace as a pretty-printed JSON array of sheets.
pub fn export(workspace: &Workspace) -> Result<String, String> {
    serde_json::to_string_pretty(workspace.sheets()).map_err(|e| e.to_string())
}

pub fn export_to(workspace: &Workspace, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, workspace.sheets()).map_err(|e| e.to_string())
}

/// Import a workspace. Rejects non-array payloads and sheets with
/// missing required fields; tolerates folder/document sheets with no
/// columns/rows/views. Table invariants (id counters, minimum one view)
/// are repaired by the engine on reconstruction.
pub fn import(payload: &str) -> Result<Workspace, String> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| e.to_string())?;
    if !value.is_array() {
        return Err("import payload must be a JSON array of sheets".to_string());
    }
    let sheets: Vec<Sheet> = serde_json::from_value(value).map_err(|e| e.to_string())?;
    Workspace::from_sheets(sheets).map_err(|e| e.to_string())
}

pub fn import_from(path: &Path) -> Result<Workspace, String> {
    let payload = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    import(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbase_engine::column::ColumnType;
    use gridbase_engine::value::Value;
    use tempfile::tempdir;

    fn sample_workspace() -> Workspace {
        let mut ws = Workspace::new();
        let sheet = ws.sheets()[0].id;
        ws.rename_sheet(sheet, "Projects").unwrap();
        let name = ws.sheet_mut(sheet).unwrap().add_column("Name", ColumnType::Text);
        let budget = ws.sheet_mut(sheet).unwrap().add_column("Budget", ColumnType::Number);
        let row = ws.sheet_mut(sheet).unwrap().add_row();
        ws.set_cell(sheet, row, name, Value::Text("Website".into())).unwrap();
        ws.set_cell(sheet, row, budget, Value::Number(12000.0)).unwrap();
        ws.sheet_mut(sheet).unwrap().select_row(row).unwrap();
        ws.add_folder("Archive", None).unwrap();
        ws.add_document("Notes", "remember the milk", None).unwrap();
        ws
    }

    #[test]
    fn test_round_trip_preserves_data() {
        let ws = sample_workspace();
        let payload = export(&ws).unwrap();
        let reloaded = import(&payload).unwrap();

        assert_eq!(reloaded.sheets().len(), ws.sheets().len());
        for (a, b) in ws.sheets().iter().zip(reloaded.sheets()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.columns(), b.columns());
            assert_eq!(a.rows(), b.rows());
            assert_eq!(a.views(), b.views());
            assert_eq!(a.selected_rows, b.selected_rows);
        }
    }

    #[test]
    fn test_round_trip_via_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        let ws = sample_workspace();
        export_to(&ws, &path).unwrap();
        let reloaded = import_from(&path).unwrap();
        assert_eq!(reloaded.sheets(), ws.sheets());
    }

    #[test]
    fn test_import_rejects_non_array() {
        assert!(import("{\"sheets\": []}").is_err());
        assert!(import("42").is_err());
        assert!(import("not json at all").is_err());
    }

    #[test]
    fn test_import_rejects_missing_fields_atomically() {
        // Second sheet lacks an id: the whole import fails
        let payload = r#"[
            {"id": 1, "name": "Ok"},
            {"name": "Broken"}
        ]"#;
        assert!(import(payload).is_err());
    }

    #[test]
    fn test_import_rejects_empty_workspace() {
        assert!(import("[]").is_err());
    }

    #[test]
    fn test_import_tolerates_folder_and_document_sheets() {
        let payload = r#"[
            {"id": 1, "name": "Data"},
            {"id": 2, "name": "Stuff", "kind": "folder"},
            {"id": 3, "name": "Readme", "kind": "document", "content": "hello"}
        ]"#;
        let ws = import(payload).unwrap();
        assert_eq!(ws.sheets().len(), 3);
        // The bare table got its mandatory view back
        assert!(ws.sheets()[0].active_view().is_some());
        assert_eq!(ws.sheets()[2].content, "hello");
    }

    #[test]
    fn test_import_reconstructs_selection_set() {
        let payload = r#"[
            {"id": 1, "name": "T",
             "rows": [{"id": 4, "cells": {}}, {"id": 5, "cells": {}}],
             "selected_rows": [5, 4, 5]}
        ]"#;
        let ws = import(payload).unwrap();
        assert_eq!(ws.sheets()[0].selected_rows.len(), 2);
    }
}
