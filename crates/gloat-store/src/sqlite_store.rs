//! Bookkeeping of applied migrations in a SQLite table

use std::rc::Rc;

use gloat_core::{
    Arg, Clock, GloatError, Migration, Migrations, Result, Store, SystemClock, Transaction,
};
use rusqlite::Connection;

use crate::db::SqliteDatabase;
use crate::errors::{into_store_error, store_error};

/// Table used when the caller does not name one
pub const DEFAULT_TABLE: &str = "schema_migrations";

/// Store keeping one row per applied version
///
/// Rows are `(version, path, applied_at)`; `path` is only filled for
/// persistable migrations and `applied_at` is seconds since the epoch.
/// Writes go through the transaction lent by the executor, reads go
/// straight to the connection.
pub struct SqliteStore {
    conn: Rc<Connection>,
    table: String,
    clock: Box<dyn Clock>,
    // false for stores opened without creating the table
    ensured: bool,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Accept plain SQL identifiers only; the table name is spliced into SQL
fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GloatError::InvalidInput {
            reason: format!("invalid migrations table name '{}'", table),
        })
    }
}

impl SqliteStore {
    /// Open the store on `db`, creating `table` if it does not exist
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a table name that is not a plain identifier,
    /// `Store` if the table cannot be created.
    pub fn new(db: &SqliteDatabase, table: &str) -> Result<Self> {
        validate_table_name(table)?;

        let store = Self {
            conn: db.shared(),
            table: table.to_string(),
            clock: Box::new(SystemClock),
            ensured: true,
        };
        store.ensure_table()?;

        tracing::debug!(table = %store.table, "migrations table ready");
        Ok(store)
    }

    /// Open the store on `db` without creating anything
    ///
    /// A missing table reads as "nothing applied". Used for dry runs and
    /// status reports, which must leave the database untouched.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a table name that is not a plain identifier.
    pub fn open_existing(db: &SqliteDatabase, table: &str) -> Result<Self> {
        validate_table_name(table)?;

        Ok(Self {
            conn: db.shared(),
            table: table.to_string(),
            clock: Box::new(SystemClock),
            ensured: false,
        })
    }

    /// Replace the clock stamping `applied_at`
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn table_exists(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [&self.table],
                |row| row.get(0),
            )
            .map_err(store_error)?;
        Ok(count > 0)
    }

    fn ensure_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY NOT NULL,
                path TEXT,
                applied_at INTEGER NOT NULL
            )",
            self.table
        );
        self.conn.execute_batch(&sql).map_err(store_error)
    }

    /// When each applied version was recorded, ascending by version
    ///
    /// # Errors
    ///
    /// Returns `Store` if the table cannot be read.
    pub fn applied_at(&self) -> Result<Vec<(i64, i64)>> {
        let sql = format!(
            "SELECT version, applied_at FROM {} ORDER BY version",
            self.table
        );
        let mut stmt = self.conn.prepare(&sql).map_err(store_error)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(store_error)?
            .collect::<std::result::Result<Vec<(i64, i64)>, _>>()
            .map_err(store_error)?;
        Ok(rows)
    }
}

impl Store for SqliteStore {
    fn collect(&self) -> Result<Migrations> {
        if !self.ensured && !self.table_exists()? {
            return Ok(Migrations::new());
        }

        let sql = format!("SELECT version, path FROM {} ORDER BY version", self.table);
        let mut stmt = self.conn.prepare(&sql).map_err(store_error)?;

        let rows = stmt
            .query_map([], |row| {
                let version: i64 = row.get(0)?;
                let path: Option<String> = row.get(1)?;
                Ok((version, path))
            })
            .map_err(store_error)?;

        let mut applied = Migrations::new();
        for row in rows {
            let (version, path) = row.map_err(store_error)?;
            let mut migration = Migration::with_version(version);
            migration.path = path.unwrap_or_default();
            applied.push(migration);
        }
        Ok(applied)
    }

    fn record(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (version, path, applied_at) VALUES (?1, ?2, ?3)",
            self.table
        );
        let path = if migration.persistable() {
            Arg::Text(&migration.path)
        } else {
            Arg::Null
        };
        let applied_at = self.clock.now().timestamp();

        tx.execute(&sql, &[Arg::Int(migration.version), path, Arg::Int(applied_at)])
            .map_err(into_store_error)
    }

    fn remove(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE version = ?1", self.table);
        tx.execute(&sql, &[Arg::Int(migration.version)])
            .map_err(into_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("schema_migrations").is_ok());
        assert!(validate_table_name("_private1").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("1table").is_err());
        assert!(validate_table_name("t; DROP TABLE users").is_err());
        assert!(validate_table_name("my-table").is_err());
    }

    #[test]
    fn test_new_creates_table() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        SqliteStore::new(&db, "applied").unwrap();
        assert_eq!(db.table_names().unwrap(), vec!["applied".to_string()]);
    }

    #[test]
    fn test_open_existing_creates_nothing() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let store = SqliteStore::open_existing(&db, DEFAULT_TABLE).unwrap();

        assert!(store.collect().unwrap().is_empty());
        assert!(db.table_names().unwrap().is_empty());
    }

    #[test]
    fn test_open_existing_reads_created_table() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let store = SqliteStore::new(&db, DEFAULT_TABLE).unwrap();
        let mut tx = gloat_core::Database::begin(&db).unwrap();
        store.record(&Migration::with_version(3), tx.as_mut()).unwrap();
        tx.commit().unwrap();

        let existing = SqliteStore::open_existing(&db, DEFAULT_TABLE).unwrap();
        assert_eq!(existing.collect().unwrap().versions(), vec![3]);
    }

    #[test]
    fn test_new_is_idempotent() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        SqliteStore::new(&db, DEFAULT_TABLE).unwrap();
        assert!(SqliteStore::new(&db, DEFAULT_TABLE).is_ok());
    }
}
