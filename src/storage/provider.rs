//! The storage access layer - address-keyed CRUD over SQLite
//!
//! [`NotesProvider`] owns the connection, resolves every incoming
//! address through the registry before touching the store, and emits a
//! change notification after every mutation. Queries hand back a
//! [`NoteCursor`] that decodes rows lazily on a single forward pass.

use std::path::Path;

use rusqlite::{Connection, Statement};

use crate::changes::ChangeNotifier;
use crate::note::{NoteRow, NoteValues};
use crate::registry::{self, NoteAddress};
use crate::uri::NoteUri;
use crate::{Error, Result};

use super::schema;

/// Address-keyed storage for notes.
///
/// The provider holds the database handle for its whole lifetime; the
/// schema is created or upgraded lazily on open. All five operations
/// take an unresolved address and fail with
/// [`Error::UnrecognizedAddress`] before any SQL is built when the
/// address matches neither recognized shape.
pub struct NotesProvider {
    conn: Connection,
    notifier: ChangeNotifier,
}

impl NotesProvider {
    /// Open a database file (creates it, and the schema, if absent)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_version(path, schema::SCHEMA_VERSION)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        schema::initialize(&conn, schema::SCHEMA_VERSION)?;
        Ok(Self {
            conn,
            notifier: ChangeNotifier::new(),
        })
    }

    pub(crate) fn open_with_version(path: &Path, version: i32) -> Result<Self> {
        let conn =
            Connection::open(path).map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        schema::initialize(&conn, version)?;
        Ok(Self {
            conn,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Registers a subscriber for change notifications.
    pub fn subscribe(&self) -> crossbeam::channel::Receiver<NoteUri> {
        self.notifier.subscribe()
    }

    /// Insert a note at the collection address.
    ///
    /// Returns the new item's address and announces it to subscribers.
    /// Item addresses are rejected with [`Error::InvalidOperation`];
    /// a field set missing `title` or `content` is rejected by the
    /// store's NOT NULL constraints as [`Error::ConstraintViolation`].
    pub fn insert(&self, uri: &NoteUri, values: &NoteValues) -> Result<NoteUri> {
        if let NoteAddress::Item(_) = registry::resolve(uri)? {
            return Err(Error::InvalidOperation(format!(
                "cannot insert into single note address {uri}"
            )));
        }

        let mut columns = Vec::new();
        let mut params: Vec<&str> = Vec::new();
        if let Some(title) = &values.title {
            columns.push(registry::COL_TITLE);
            params.push(title);
        }
        if let Some(content) = &values.content {
            columns.push(registry::COL_CONTENT);
            params.push(content);
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", registry::TABLE)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                registry::TABLE,
                columns.join(", "),
                vec!["?"; columns.len()].join(", ")
            )
        };

        self.conn
            .execute(&sql, rusqlite::params_from_iter(params))?;
        let id = self.conn.last_insert_rowid();
        if id <= 0 {
            return Err(Error::StoreUnavailable(format!(
                "store reported no new row for insert into {uri}"
            )));
        }

        let item = registry::item_uri(id);
        tracing::debug!("Inserted note {}", item);
        self.notifier.notify_change(&item);
        Ok(item)
    }

    /// Query notes at a collection or item address.
    ///
    /// `projection` narrows the returned columns (absent = all three),
    /// `filter`/`filter_args` select rows, `sort_order` is passed to the
    /// store verbatim. For an item address the row identifier predicate
    /// is AND-combined with any supplied filter. Rows are not read
    /// until the returned cursor is iterated.
    pub fn query(
        &self,
        uri: &NoteUri,
        projection: Option<&[&str]>,
        filter: Option<&str>,
        filter_args: &[&str],
        sort_order: Option<&str>,
    ) -> Result<NoteCursor<'_>> {
        let address = registry::resolve(uri)?;
        let columns = registry::check_projection(projection)?;

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), registry::TABLE);
        if let Some(predicate) = address_predicate(address, filter) {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }
        if let Some(sort) = normalized(sort_order) {
            sql.push_str(" ORDER BY ");
            sql.push_str(sort);
        }

        let stmt = self.conn.prepare(&sql)?;
        Ok(NoteCursor {
            stmt,
            params: filter_args.iter().map(|arg| arg.to_string()).collect(),
            columns,
            consumed: false,
        })
    }

    /// Update notes at a collection or item address.
    ///
    /// Returns the number of rows changed (0 is not an error) and
    /// announces the request address to subscribers whether or not any
    /// row matched. An empty field set fails with
    /// [`Error::ConstraintViolation`] before reaching the store. For an
    /// item address any supplied filter is AND-combined with the row
    /// identifier predicate.
    pub fn update(
        &self,
        uri: &NoteUri,
        values: &NoteValues,
        filter: Option<&str>,
        filter_args: &[&str],
    ) -> Result<usize> {
        let address = registry::resolve(uri)?;
        if values.is_empty() {
            return Err(Error::ConstraintViolation(
                "update requires at least one field".to_string(),
            ));
        }

        let mut assignments = Vec::new();
        let mut params: Vec<&str> = Vec::new();
        if let Some(title) = &values.title {
            assignments.push(format!("{} = ?", registry::COL_TITLE));
            params.push(title);
        }
        if let Some(content) = &values.content {
            assignments.push(format!("{} = ?", registry::COL_CONTENT));
            params.push(content);
        }
        params.extend(filter_args.iter().copied());

        let mut sql = format!("UPDATE {} SET {}", registry::TABLE, assignments.join(", "));
        if let Some(predicate) = address_predicate(address, filter) {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }

        let affected = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(params))?;
        tracing::debug!("Updated {} note(s) at {}", affected, uri);
        self.notifier.notify_change(uri);
        Ok(affected)
    }

    /// Delete notes at a collection or item address.
    ///
    /// Returns the number of rows removed (0 is not an error) and
    /// announces the request address to subscribers unconditionally.
    pub fn delete(&self, uri: &NoteUri, filter: Option<&str>, filter_args: &[&str]) -> Result<usize> {
        let address = registry::resolve(uri)?;

        let mut sql = format!("DELETE FROM {}", registry::TABLE);
        if let Some(predicate) = address_predicate(address, filter) {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }

        let affected = self.conn.execute(
            &sql,
            rusqlite::params_from_iter(filter_args.iter().copied()),
        )?;
        tracing::debug!("Deleted {} note(s) at {}", affected, uri);
        self.notifier.notify_change(uri);
        Ok(affected)
    }

    /// Content type advertised for an address.
    pub fn content_type(&self, uri: &NoteUri) -> Result<&'static str> {
        Ok(registry::resolve(uri)?.content_type())
    }
}

/// Scoped handle over one query's result rows.
///
/// The cursor owns the prepared statement and the bound filter
/// arguments; dropping it (or calling [`NoteCursor::close`]) releases
/// the statement. Rows are decoded one at a time as the iterator from
/// [`NoteCursor::rows`] is pulled - a single forward, non-restartable
/// pass.
#[derive(Debug)]
pub struct NoteCursor<'conn> {
    stmt: Statement<'conn>,
    params: Vec<String>,
    columns: Vec<&'static str>,
    consumed: bool,
}

impl<'conn> NoteCursor<'conn> {
    /// Columns each row carries, in projection order.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Starts the single pass over the result rows.
    ///
    /// A second call fails with [`Error::InvalidOperation`]; the pass
    /// cannot be restarted.
    pub fn rows(&mut self) -> Result<impl Iterator<Item = Result<NoteRow>> + '_> {
        if self.consumed {
            return Err(Error::InvalidOperation(
                "query cursor is single-pass and already consumed".to_string(),
            ));
        }
        self.consumed = true;

        let columns = self.columns.clone();
        let mapped = self.stmt.query_map(
            rusqlite::params_from_iter(self.params.iter()),
            move |row| read_row(row, &columns),
        )?;
        Ok(mapped.map(|row| row.map_err(Error::from)))
    }

    /// Releases the underlying statement.
    pub fn close(self) {}
}

/// Decode one store row into the fields the projection asked for.
fn read_row(row: &rusqlite::Row, columns: &[&'static str]) -> rusqlite::Result<NoteRow> {
    let mut note = NoteRow::default();
    for (idx, column) in columns.iter().enumerate() {
        match *column {
            registry::COL_ID => note.id = Some(row.get(idx)?),
            registry::COL_TITLE => note.title = Some(row.get(idx)?),
            registry::COL_CONTENT => note.content = Some(row.get(idx)?),
            _ => {}
        }
    }
    Ok(note)
}

/// WHERE-clause text for an address, merged with any caller filter.
///
/// An empty filter string counts as absent. For an item address the
/// identifier is rendered as decimal text; caller filter text is always
/// wrapped in parentheses so its operator precedence cannot leak into
/// the identifier predicate.
fn address_predicate(address: NoteAddress, filter: Option<&str>) -> Option<String> {
    match (address, normalized(filter)) {
        (NoteAddress::Collection, None) => None,
        (NoteAddress::Collection, Some(filter)) => Some(filter.to_string()),
        (NoteAddress::Item(id), None) => Some(format!("{} = {id}", registry::COL_ID)),
        (NoteAddress::Item(id), Some(filter)) => {
            Some(format!("{} = {id} AND ({filter})", registry::COL_ID))
        }
    }
}

fn normalized(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}
