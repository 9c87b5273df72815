// `gbase inspect` - sheet tree, schemas, relation health

use std::path::Path;

use gridbase_engine::sheet::{Sheet, SheetId, SheetKind};
use gridbase_engine::workspace::Workspace;

use crate::exit_codes::CliError;
use crate::util;

pub fn run(path: &Path) -> Result<(), CliError> {
    let ws = util::open_workspace(path)?;
    print!("{}", render(&ws));
    Ok(())
}

pub fn render(ws: &Workspace) -> String {
    let mut out = String::new();
    for sheet in ws.children(None) {
        render_sheet(ws, sheet, 0, &mut out);
    }

    let orphans = ws.orphaned_relation_columns();
    if !orphans.is_empty() {
        out.push_str("\norphaned relation columns:\n");
        for (sheet_id, column_id) in orphans {
            if let Some(sheet) = ws.sheet(sheet_id) {
                let label = sheet
                    .column(column_id)
                    .map(|c| c.label.clone())
                    .unwrap_or_default();
                out.push_str(&format!("  {} / {}\n", sheet.name, label));
            }
        }
    }
    out
}

fn render_sheet(ws: &Workspace, sheet: &Sheet, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match sheet.kind {
        SheetKind::Folder => {
            out.push_str(&format!("{}{}/\n", indent, sheet.name));
        }
        SheetKind::Document => {
            out.push_str(&format!("{}{} (document)\n", indent, sheet.name));
        }
        SheetKind::Table => {
            let columns: Vec<String> = sheet
                .columns()
                .iter()
                .map(|c| format!("{} ({})", c.label, format!("{:?}", c.ty).to_lowercase()))
                .collect();
            out.push_str(&format!(
                "{}{}  [{} rows, {} views]  {}\n",
                indent,
                sheet.name,
                sheet.rows().len(),
                sheet.views().len(),
                columns.join(", ")
            ));
        }
    }
    for child in child_sheets(ws, sheet.id) {
        render_sheet(ws, child, depth + 1, out);
    }
}

fn child_sheets(ws: &Workspace, parent: SheetId) -> Vec<&Sheet> {
    ws.children(Some(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbase_engine::column::ColumnType;

    #[test]
    fn test_render_tree_and_orphans() {
        let mut ws = Workspace::new();
        let projects = ws.sheets()[0].id;
        ws.rename_sheet(projects, "Projects").unwrap();
        ws.sheet_mut(projects).unwrap().add_column("Name", ColumnType::Text);
        let folder = ws.add_folder("Archive", None).unwrap();
        let old = ws.add_sheet("Old", Some(folder)).unwrap();
        let forward = ws.add_relation_column(projects, "Old stuff", old).unwrap();
        let back =
            gridbase_engine::relation::find_back_link(ws.sheet(old).unwrap(), projects).unwrap();
        ws.sheet_mut(old).unwrap().delete_column(back).unwrap();

        let text = render(&ws);
        assert!(text.contains("Projects"));
        assert!(text.contains("Archive/"));
        assert!(text.contains("  Old"));
        assert!(text.contains("orphaned relation columns:"));
        assert!(text.contains("Old stuff"));
        assert!(ws.orphaned_relation_columns().contains(&(projects, forward)));
    }
}
