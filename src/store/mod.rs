//! Vector index - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - schema_entries(id, description, vector, metadata)
//!
//! One row per live table in the source schema; the synchronizer is the only
//! writer.

pub mod schema;
pub mod sqlite;

pub use sqlite::{EntryMetadata, IndexEntry, SqliteIndex};
