//! Schema/Address Registry - the naming contract for the notes store
//!
//! Everything that names the store lives here: the address scheme, the
//! table and column names, the advertised content types, and the two
//! recognized address shapes. The storage layer resolves every incoming
//! address through [`resolve`] before it touches SQLite, so an address
//! that does not match one of the shapes never reaches a statement.

use crate::uri::NoteUri;
use crate::{Error, Result};

/// Scheme every notes address must carry.
pub const AUTHORITY: &str = "noted";

/// Table holding the notes. Doubles as the address path segment.
pub const TABLE: &str = "notes";

/// Row identifier column.
pub const COL_ID: &str = "_id";

/// Note title column (required).
pub const COL_TITLE: &str = "title";

/// Note body column (required).
pub const COL_CONTENT: &str = "content";

/// Every projectable column, in storage order.
pub const COLUMNS: [&str; 3] = [COL_ID, COL_TITLE, COL_CONTENT];

/// Content type advertised for the whole notes set.
pub const MIME_COLLECTION: &str = "vnd.noted.cursor.dir/vnd.noted.notes";

/// Content type advertised for a single note.
pub const MIME_ITEM: &str = "vnd.noted.cursor.item/vnd.noted.notes";

/// A resolved address: either the whole notes set or one row of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAddress {
    /// `noted://notes`
    Collection,
    /// `noted://notes/<id>`
    Item(i64),
}

impl NoteAddress {
    /// Content type for this address shape.
    pub fn content_type(&self) -> &'static str {
        match self {
            NoteAddress::Collection => MIME_COLLECTION,
            NoteAddress::Item(_) => MIME_ITEM,
        }
    }

    /// Canonical URI form of this address.
    pub fn to_uri(&self) -> NoteUri {
        match self {
            NoteAddress::Collection => collection_uri(),
            NoteAddress::Item(id) => item_uri(*id),
        }
    }
}

/// Address of the notes collection: `noted://notes`.
pub fn collection_uri() -> NoteUri {
    NoteUri::new(AUTHORITY, [TABLE])
}

/// Address of a single note: `noted://notes/<id>`.
pub fn item_uri(id: i64) -> NoteUri {
    collection_uri().child(id.to_string())
}

/// Resolves a parsed address against the registry.
///
/// Exactly two shapes are recognized: `noted://notes` (collection) and
/// `noted://notes/<id>` where `<id>` is all ASCII digits and fits a
/// non-negative 64-bit integer. Everything else, including a mismatched
/// scheme, extra segments, or an empty trailing segment, is rejected
/// with [`Error::UnrecognizedAddress`].
pub fn resolve(uri: &NoteUri) -> Result<NoteAddress> {
    if uri.scheme != AUTHORITY {
        return Err(Error::UnrecognizedAddress(uri.to_uri_string()));
    }
    match uri.segments.as_slice() {
        [table] if table == TABLE => Ok(NoteAddress::Collection),
        [table, id] if table == TABLE => parse_note_id(id)
            .map(NoteAddress::Item)
            .ok_or_else(|| Error::UnrecognizedAddress(uri.to_uri_string())),
        _ => Err(Error::UnrecognizedAddress(uri.to_uri_string())),
    }
}

/// Validates a caller projection against the registry columns.
///
/// An absent or empty projection selects every column in storage order.
/// A projection naming anything outside [`COLUMNS`] fails with
/// [`Error::UnknownColumn`] before any statement is prepared.
pub fn check_projection(projection: Option<&[&str]>) -> Result<Vec<&'static str>> {
    match projection {
        None => Ok(COLUMNS.to_vec()),
        Some([]) => Ok(COLUMNS.to_vec()),
        Some(requested) => requested
            .iter()
            .map(|col| {
                COLUMNS
                    .iter()
                    .copied()
                    .find(|known| known == col)
                    .ok_or_else(|| Error::UnknownColumn((*col).to_string()))
            })
            .collect(),
    }
}

fn parse_note_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_shapes_resolve() {
        let collection = NoteUri::parse("noted://notes").unwrap();
        assert_eq!(resolve(&collection).unwrap(), NoteAddress::Collection);

        let item = NoteUri::parse("noted://notes/42").unwrap();
        assert_eq!(resolve(&item).unwrap(), NoteAddress::Item(42));
    }

    #[test]
    fn test_constructors_resolve_back() {
        assert_eq!(resolve(&collection_uri()).unwrap(), NoteAddress::Collection);
        assert_eq!(resolve(&item_uri(7)).unwrap(), NoteAddress::Item(7));
        assert_eq!(item_uri(7).to_uri_string(), "noted://notes/7");
    }

    #[test]
    fn test_foreign_scheme_is_unrecognized() {
        let uri = NoteUri::parse("other://notes/1").unwrap();
        assert!(matches!(resolve(&uri), Err(Error::UnrecognizedAddress(_))));
    }

    #[test]
    fn test_unknown_shapes_are_unrecognized() {
        for raw in [
            "noted://tasks",
            "noted://notes/1/2",
            "noted://notes/",
            "noted://",
            "noted://notes/abc",
            "noted://notes/-3",
            "noted://notes/1x",
            "noted://NOTES",
            "noted://notes?x=1",
            "noted://notes#1",
            "noted://notes/1?x=1",
            "noted://notes/1#2",
        ] {
            let uri = NoteUri::parse(raw).unwrap();
            assert!(
                matches!(resolve(&uri), Err(Error::UnrecognizedAddress(_))),
                "{raw} should not resolve"
            );
        }
    }

    #[test]
    fn test_overflowing_id_is_unrecognized() {
        // One past i64::MAX.
        let uri = NoteUri::parse("noted://notes/9223372036854775808").unwrap();
        assert!(matches!(resolve(&uri), Err(Error::UnrecognizedAddress(_))));

        let max = NoteUri::parse("noted://notes/9223372036854775807").unwrap();
        assert_eq!(resolve(&max).unwrap(), NoteAddress::Item(i64::MAX));
    }

    #[test]
    fn test_content_types_cover_both_shapes() {
        assert_eq!(
            NoteAddress::Collection.content_type(),
            "vnd.noted.cursor.dir/vnd.noted.notes"
        );
        assert_eq!(
            NoteAddress::Item(1).content_type(),
            "vnd.noted.cursor.item/vnd.noted.notes"
        );
    }

    #[test]
    fn test_projection_defaults_to_all_columns() {
        assert_eq!(check_projection(None).unwrap(), COLUMNS.to_vec());
        assert_eq!(check_projection(Some(&[])).unwrap(), COLUMNS.to_vec());
    }

    #[test]
    fn test_projection_keeps_requested_order() {
        let cols = check_projection(Some(&["title", "_id"])).unwrap();
        assert_eq!(cols, vec!["title", "_id"]);
    }

    #[test]
    fn test_unknown_projection_column_is_rejected() {
        let err = check_projection(Some(&["title", "owner"])).unwrap_err();
        match err {
            Error::UnknownColumn(col) => assert_eq!(col, "owner"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
