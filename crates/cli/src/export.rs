// `gbase export` / `gbase import` - interchange JSON <-> native file

use std::path::Path;

use gridbase_io::{json, native};

use crate::exit_codes::CliError;
use crate::util;

/// Native (or JSON) workspace file -> interchange JSON.
pub fn export(input: &Path, output: &Path) -> Result<(), CliError> {
    let ws = util::open_workspace(input)?;
    json::export_to(&ws, output)?;
    Ok(())
}

/// Interchange JSON -> native workspace file. Import is atomic: a bad
/// payload leaves no output file behind.
pub fn import(input: &Path, output: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::usage(format!("no such file: {}", input.display())));
    }
    let ws = json::import_from(input)?;
    native::save(&ws, output)?;
    Ok(())
}
