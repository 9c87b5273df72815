// Native .gbase format using SQLite
//
// One row per sheet (JSON blob) plus a key/value meta table. The blob is
// the same serialization the JSON interchange uses, so the two paths
// cannot drift.

use std::path::Path;

use rusqlite::{params, Connection};

use gridbase_engine::sheet::{Sheet, SheetId};
use gridbase_engine::workspace::Workspace;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sheets (
    id INTEGER PRIMARY KEY,
    position INTEGER NOT NULL,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

const SCHEMA_VERSION: i64 = 1;

pub fn save(workspace: &Workspace, path: &Path) -> Result<(), String> {
    // Delete existing file if present (SQLite will create fresh)
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| e.to_string())?;
    }

    let conn = Connection::open(path).map_err(|e| e.to_string())?;
    conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;

    conn.execute("BEGIN TRANSACTION", []).map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION.to_string()],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)",
        params!["next_sheet_id", workspace.next_sheet_id().to_string()],
    )
    .map_err(|e| e.to_string())?;

    if let Some(active) = workspace.active_sheet {
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)",
            params!["active_sheet", active.0.to_string()],
        )
        .map_err(|e| e.to_string())?;
    }

    for (position, sheet) in workspace.sheets().iter().enumerate() {
        let data = serde_json::to_string(sheet).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sheets (id, position, data) VALUES (?1, ?2, ?3)",
            params![sheet.id.0 as i64, position as i64, data],
        )
        .map_err(|e| e.to_string())?;
    }

    conn.execute("COMMIT", []).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Workspace, String> {
    let conn = Connection::open(path).map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare("SELECT data FROM sheets ORDER BY position")
        .map_err(|e| e.to_string())?;
    let blobs = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| e.to_string())?;

    let mut sheets: Vec<Sheet> = Vec::new();
    for blob in blobs {
        let blob = blob.map_err(|e| e.to_string())?;
        sheets.push(serde_json::from_str(&blob).map_err(|e| e.to_string())?);
    }

    let mut workspace = Workspace::from_sheets(sheets).map_err(|e| e.to_string())?;

    if let Some(value) = meta(&conn, "next_sheet_id")? {
        if let Ok(id) = value.parse::<u64>() {
            workspace.set_next_sheet_id(id);
        }
    }
    if let Some(value) = meta(&conn, "active_sheet")? {
        if let Ok(id) = value.parse::<u64>() {
            if workspace.sheet(SheetId(id)).is_some() {
                workspace.active_sheet = Some(SheetId(id));
            }
        }
    }

    Ok(workspace)
}

fn meta(conn: &Connection, key: &str) -> Result<Option<String>, String> {
    use rusqlite::OptionalExtension;
    conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbase_engine::column::ColumnType;
    use gridbase_engine::value::Value;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.gbase");

        let mut ws = Workspace::new();
        let sheet = ws.sheets()[0].id;
        let name = ws.sheet_mut(sheet).unwrap().add_column("Name", ColumnType::Text);
        let row = ws.sheet_mut(sheet).unwrap().add_row();
        ws.set_cell(sheet, row, name, Value::Text("Alice".into())).unwrap();
        ws.add_folder("Archive", None).unwrap();

        save(&ws, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.sheets(), ws.sheets());
        assert_eq!(loaded.active_sheet, ws.active_sheet);
        assert_eq!(loaded.next_sheet_id(), ws.next_sheet_id());
    }

    #[test]
    fn test_next_sheet_id_survives_deletions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.gbase");

        let mut ws = Workspace::new();
        let doomed = ws.add_sheet("Temp", None).unwrap();
        ws.delete_sheet(doomed).unwrap();
        let counter = ws.next_sheet_id();

        save(&ws, &path).unwrap();
        let mut loaded = load(&path).unwrap();
        // Ids of deleted sheets are never reused after a reload
        assert_eq!(loaded.next_sheet_id(), counter);
        let fresh = loaded.add_sheet("New", None).unwrap();
        assert_ne!(fresh, doomed);
        assert!(fresh.0 >= counter);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.gbase");

        let ws = Workspace::new();
        save(&ws, &path).unwrap();

        let mut bigger = Workspace::new();
        bigger.add_sheet("Second", None).unwrap();
        save(&bigger, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.sheets().len(), 2);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("missing.gbase");
        assert!(load(&path).is_err());
    }
}
