//! Storage layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - notes(_id, title, content)
//!
//! The schema is created lazily on first open and versioned through
//! `user_version`; the provider dispatches every operation through the
//! address registry.

pub mod provider;
pub mod schema;

pub use provider::{NoteCursor, NotesProvider};
