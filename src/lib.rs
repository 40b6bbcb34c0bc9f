//! # Noted - address-keyed embedded notes store
//!
//! URI-resolved CRUD over SQLite with change notifications.
//!
//! Noted provides:
//! - A schema/address registry mapping `noted://notes` and
//!   `noted://notes/<id>` addresses onto a single `notes` table
//! - A storage access layer owning the SQLite handle, with lazy schema
//!   creation and a drop-and-recreate version upgrade path
//! - Lazy, single-pass query cursors over projected note rows
//! - Change notifications announcing every mutated address

pub mod uri;
pub mod note;
pub mod registry;
pub mod changes;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use changes::ChangeNotifier;
pub use note::{Note, NoteRow, NoteValues};
pub use registry::NoteAddress;
pub use storage::{NoteCursor, NotesProvider};
pub use uri::NoteUri;

/// Result type alias for notes storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for notes storage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized address: {0}")]
    UnrecognizedAddress(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Storage error: {0}")]
    Store(#[source] rusqlite::Error),
}

// SQLite constraint failures surface as their own kind; everything else
// stays a raw storage error.
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::ConstraintViolation(message.unwrap_or_else(|| code.to_string()))
            }
            other => Error::Store(other),
        }
    }
}
