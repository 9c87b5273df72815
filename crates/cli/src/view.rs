// `gbase view` - print a sheet's visible rows under a view

use std::path::Path;

use gridbase_engine::group;
use gridbase_engine::pipeline;
use gridbase_engine::sheet::Sheet;
use gridbase_engine::view::View;
use gridbase_engine::workspace::Workspace;

use crate::exit_codes::CliError;
use crate::util;

pub fn run(
    path: &Path,
    sheet_name: Option<&str>,
    view_name: Option<&str>,
    search: &str,
    grouped: bool,
) -> Result<(), CliError> {
    let ws = util::open_workspace(path)?;
    let sheet = resolve_sheet(&ws, sheet_name)?;
    let view = resolve_view(sheet, view_name)?;
    print!("{}", render(sheet, view, search, grouped));
    Ok(())
}

fn resolve_sheet<'a>(ws: &'a Workspace, name: Option<&str>) -> Result<&'a Sheet, CliError> {
    let sheet = match name {
        Some(name) => ws
            .sheet_by_name(name)
            .ok_or_else(|| CliError::usage(format!("no sheet named '{}'", name)))?,
        None => ws
            .active_sheet
            .and_then(|id| ws.sheet(id))
            .ok_or_else(|| CliError::usage("no active sheet; pass --sheet"))?,
    };
    if !sheet.is_table() {
        return Err(CliError::usage(format!("'{}' is not a table", sheet.name)));
    }
    Ok(sheet)
}

fn resolve_view<'a>(sheet: &'a Sheet, name: Option<&str>) -> Result<&'a View, CliError> {
    match name {
        Some(name) => sheet
            .views()
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| CliError::usage(format!("no view named '{}'", name))),
        None => sheet
            .active_view()
            .ok_or_else(|| CliError::usage("sheet has no active view")),
    }
}

/// Tab-separated rows, hidden columns omitted, in pipeline order. With
/// `grouped`, partitions follow the view's group-by column.
pub fn render(sheet: &Sheet, view: &View, search: &str, grouped: bool) -> String {
    let visible_columns: Vec<_> = sheet
        .columns()
        .iter()
        .filter(|c| !view.config.hidden_columns.contains(&c.id))
        .collect();
    let rows = pipeline::derive_visible_rows(sheet, view, search);

    let mut out = String::new();
    let header: Vec<&str> = visible_columns.iter().map(|c| c.label.as_str()).collect();
    out.push_str(&header.join("\t"));
    out.push('\n');

    let render_row = |row: &gridbase_engine::sheet::Row| {
        visible_columns
            .iter()
            .map(|c| row.value(c.id).to_display())
            .collect::<Vec<_>>()
            .join("\t")
    };

    match (grouped, view.config.group_by) {
        (true, Some(group_by)) => {
            for (key, bucket) in group::group_rows(&rows, group_by, sheet.columns()) {
                out.push_str(&format!("== {} ({})\n", key, bucket.len()));
                for row in bucket {
                    out.push_str(&render_row(row));
                    out.push('\n');
                }
            }
        }
        _ => {
            for row in &rows {
                out.push_str(&render_row(row));
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbase_engine::column::{ColumnType, FilterOperator};
    use gridbase_engine::sheet::SheetId;
    use gridbase_engine::value::Value;
    use gridbase_engine::view::{Filter, SortDirection, SortRule};

    fn sheet() -> Sheet {
        let mut sheet = Sheet::new_table(SheetId(1), "Projects");
        let name = sheet.add_column("Name", ColumnType::Text);
        let status = sheet.add_column("Status", ColumnType::Select);
        sheet.add_select_option(status, "active", "green").unwrap();
        sheet.add_select_option(status, "done", "gray").unwrap();
        for (n, s) in [("Website", "active"), ("App", "done"), ("Rebrand", "active")] {
            let row = sheet.add_row();
            sheet.set_cell(row, name, Value::Text(n.into())).unwrap();
            sheet.set_cell(row, status, Value::Text(s.into())).unwrap();
        }
        sheet
    }

    #[test]
    fn test_render_flat() {
        let mut sheet = sheet();
        let name = sheet.column_by_label("Name").unwrap().id;
        let view_id = sheet.views()[0].id;
        sheet
            .set_sort(view_id, Some(SortRule { column: name, direction: SortDirection::Ascending }))
            .unwrap();
        let view = sheet.view(view_id).unwrap();
        let text = render(&sheet, view, "", false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name\tStatus");
        assert_eq!(lines[1], "App\tdone");
        assert_eq!(lines[2], "Rebrand\tactive");
        assert_eq!(lines[3], "Website\tactive");
    }

    #[test]
    fn test_render_filtered_and_grouped() {
        let mut sheet = sheet();
        let status = sheet.column_by_label("Status").unwrap().id;
        let view_id = sheet.views()[0].id;
        sheet.set_group_by(view_id, Some(status)).unwrap();
        sheet
            .set_filters(
                view_id,
                vec![Filter { id: 1, column: status, op: FilterOperator::Equals, value: "active".into() }],
            )
            .unwrap();
        let view = sheet.view(view_id).unwrap();
        let text = render(&sheet, view, "", true);
        assert!(text.contains("== active (2)"));
        assert!(text.contains("== done (0)"));
        assert!(text.contains(&format!("== {} (0)", group::UNGROUPED)));
    }

    #[test]
    fn test_render_respects_hidden_columns_and_search() {
        let mut sheet = sheet();
        let status = sheet.column_by_label("Status").unwrap().id;
        let view_id = sheet.views()[0].id;
        sheet.hide_column(view_id, status).unwrap();
        let view = sheet.view(view_id).unwrap();
        let text = render(&sheet, view, "web", false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Name", "Website"]);
    }
}
