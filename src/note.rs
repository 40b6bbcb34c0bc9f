//! Note types - the stored record and its write/read shapes
//!
//! A [`Note`] is a fully materialized row. Writes go through
//! [`NoteValues`] (only the fields being set), reads come back as
//! [`NoteRow`] (only the fields the caller projected).

use serde::{Deserialize, Serialize};

/// A complete note as stored: row id plus both text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Field set for an insert or update.
///
/// Absent fields are left untouched by updates and fall back to column
/// defaults on insert (which the schema rejects for the text columns,
/// since both are NOT NULL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteValues {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// True when no field is set at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// One row of a query result, shaped by the caller's projection.
///
/// Fields the projection did not ask for stay `None`, so a row from a
/// narrow projection never pretends to carry data it was not read with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteRow {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteRow {
    /// Converts into a full [`Note`] if every field was projected.
    pub fn into_note(self) -> Option<Note> {
        Some(Note {
            id: self.id?,
            title: self.title?,
            content: self.content?,
        })
    }
}

impl From<Note> for NoteRow {
    fn from(note: Note) -> Self {
        Self {
            id: Some(note.id),
            title: Some(note.title),
            content: Some(note.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_builder_sets_fields() {
        let values = NoteValues::new()
            .with_title("Groceries")
            .with_content("milk, eggs");
        assert_eq!(values.title.as_deref(), Some("Groceries"));
        assert_eq!(values.content.as_deref(), Some("milk, eggs"));
        assert!(!values.is_empty());
    }

    #[test]
    fn test_empty_values_report_empty() {
        assert!(NoteValues::new().is_empty());
        assert!(!NoteValues::new().with_title("x").is_empty());
    }

    #[test]
    fn test_full_row_becomes_note() {
        let row = NoteRow::from(Note::new(7, "a", "b"));
        let note = row.into_note().unwrap();
        assert_eq!(note, Note::new(7, "a", "b"));
    }

    #[test]
    fn test_partial_row_does_not_become_note() {
        let row = NoteRow {
            id: Some(1),
            title: None,
            content: Some("body".into()),
        };
        assert!(row.into_note().is_none());
    }
}
