//! gloat store - SQLite persistence and migration sources
//!
//! Provides:
//! - `SqliteDatabase`, the rusqlite-backed `Database` / `Transaction`
//! - `SqliteStore`, bookkeeping of applied versions in a migrations table
//! - `FileSystemSource` and `EmbeddedSource` for declared migrations
//! - `write_migration`, laying a generated migration out on disk

pub mod db;
pub mod errors;
pub mod source;
pub mod sqlite_store;
pub mod writer;

// Re-export key types
pub use db::SqliteDatabase;
pub use source::{EmbeddedMigration, EmbeddedSource, FileSystemSource};
pub use sqlite_store::{SqliteStore, DEFAULT_TABLE};
pub use writer::write_migration;
