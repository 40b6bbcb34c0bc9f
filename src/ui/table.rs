use tabled::builder::Builder;
use tabled::settings::Style;

use crate::note::NoteRow;
use crate::registry;

/// Renders note rows under their projected column headers.
///
/// Columns the projection skipped never appear; a field a row does not
/// carry renders as an empty cell.
pub fn notes_table(columns: &[&str], rows: &[NoteRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|column| column.to_string()));
    for row in rows {
        builder.push_record(columns.iter().map(|column| cell(row, column)));
    }

    builder.build().with(Style::rounded()).to_string()
}

fn cell(row: &NoteRow, column: &str) -> String {
    match column {
        registry::COL_ID => row.id.map(|id| id.to_string()).unwrap_or_default(),
        registry::COL_TITLE => row.title.clone().unwrap_or_default(),
        registry::COL_CONTENT => row.content.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_render_nothing() {
        assert_eq!(notes_table(&["_id", "title"], &[]), "");
    }

    #[test]
    fn test_table_follows_projection_order() {
        let row = NoteRow {
            id: Some(1),
            title: Some("Groceries".into()),
            content: None,
        };
        let rendered = notes_table(&["title", "_id"], &[row]);
        assert!(rendered.contains("Groceries"));
        let title_pos = rendered.find("title").unwrap();
        let id_pos = rendered.find("_id").unwrap();
        assert!(title_pos < id_pos, "headers must keep projection order");
    }
}
