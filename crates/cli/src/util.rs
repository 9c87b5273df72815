// Shared helpers: workspace file open/save by extension

use std::path::Path;

use gridbase_engine::workspace::Workspace;
use gridbase_io::{json, native};

use crate::exit_codes::CliError;

/// Open a workspace file. `.json` is interchange JSON, anything else is
/// the native SQLite format.
pub fn open_workspace(path: &Path) -> Result<Workspace, CliError> {
    if !path.exists() {
        return Err(CliError::usage(format!("no such file: {}", path.display())));
    }
    let ws = if is_json(path) {
        json::import_from(path)?
    } else {
        native::load(path)?
    };
    Ok(ws)
}

/// Save a workspace, format chosen by extension like `open_workspace`.
pub fn save_workspace(workspace: &Workspace, path: &Path) -> Result<(), CliError> {
    if is_json(path) {
        json::export_to(workspace, path)?;
    } else {
        native::save(workspace, path)?;
    }
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
