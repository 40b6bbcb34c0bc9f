//! Notes table DDL and the lazy schema lifecycle
//!
//! The on-disk schema version lives in SQLite's `user_version` slot. A
//! fresh database reads 0 and gets the schema created on first open; an
//! older version is upgraded by dropping and recreating the table; a
//! newer version is refused so an old binary never writes into a layout
//! it does not understand.

use rusqlite::Connection;

use crate::{Error, Result};

/// Schema version stamped into `user_version`
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create the notes table
pub const CREATE_NOTES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
)
"#;

/// SQL to drop the notes table on upgrade
pub const DROP_NOTES_TABLE: &str = "DROP TABLE IF EXISTS notes";

/// Reads the schema version recorded in the database (0 = never initialized).
pub fn read_version(conn: &Connection) -> Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(unavailable)
}

/// Records `version` as the database's schema version.
///
/// PRAGMA statements cannot carry bound parameters; `version` only ever
/// comes from crate constants.
pub fn write_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version}"))
        .map_err(unavailable)
}

/// Brings a connection up to schema version `expected`.
///
/// No-op when already current. Creates the table on a fresh database,
/// drops and recreates it when the on-disk version is older, and fails
/// with [`Error::StoreUnavailable`] when it is newer.
pub fn initialize(conn: &Connection, expected: i32) -> Result<()> {
    let on_disk = read_version(conn)?;
    if on_disk == expected {
        return Ok(());
    }
    if on_disk > expected {
        return Err(Error::StoreUnavailable(format!(
            "database schema version {on_disk} is newer than supported version {expected}"
        )));
    }
    if on_disk == 0 {
        tracing::debug!("Creating notes schema at version {}", expected);
    } else {
        tracing::debug!("Upgrading notes schema from {} to {}", on_disk, expected);
        conn.execute_batch(DROP_NOTES_TABLE).map_err(unavailable)?;
    }
    conn.execute_batch(CREATE_NOTES_TABLE).map_err(unavailable)?;
    write_version(conn, expected)
}

fn unavailable(err: rusqlite::Error) -> Error {
    Error::StoreUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn test_ddl_names_every_registry_column() {
        for column in registry::COLUMNS {
            assert!(
                CREATE_NOTES_TABLE.contains(column),
                "DDL is missing column {column}"
            );
        }
        assert!(CREATE_NOTES_TABLE.contains(registry::TABLE));
    }

    #[test]
    fn test_fresh_database_reads_version_zero() {
        let conn = test_connection();
        assert_eq!(read_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_initialize_creates_table_and_stamps_version() {
        let conn = test_connection();
        initialize(&conn, SCHEMA_VERSION).unwrap();
        assert!(table_exists(&conn, registry::TABLE));
        assert_eq!(read_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = test_connection();
        initialize(&conn, SCHEMA_VERSION).unwrap();
        conn.execute(
            "INSERT INTO notes (title, content) VALUES ('a', 'b')",
            [],
        )
        .unwrap();
        initialize(&conn, SCHEMA_VERSION).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1, "re-initializing at the same version must keep rows");
    }

    #[test]
    fn test_upgrade_drops_existing_rows() {
        let conn = test_connection();
        initialize(&conn, 1).unwrap();
        conn.execute(
            "INSERT INTO notes (title, content) VALUES ('a', 'b')",
            [],
        )
        .unwrap();

        initialize(&conn, 2).unwrap();
        assert_eq!(read_version(&conn).unwrap(), 2);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0, "upgrade recreates the table empty");
    }

    #[test]
    fn test_newer_on_disk_version_is_refused() {
        let conn = test_connection();
        initialize(&conn, 3).unwrap();
        let err = initialize(&conn, 2).unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }
}
