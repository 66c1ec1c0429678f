//! SQLite database handle and transactions

use std::path::Path;
use std::rc::Rc;

use gloat_core::{Arg, Database, GloatError, Result, Transaction};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::errors::{commit_error, connection_error, execution_error, store_error};

/// A SQLite connection shared by the executor and the store
///
/// Cloning is cheap and shares the connection. Migrations run on a single
/// call chain, so the connection is never used from two threads.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    conn: Rc<Connection>,
}

impl SqliteDatabase {
    /// Open a SQLite database at the given path
    ///
    /// # Errors
    ///
    /// Returns `Connection` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Connection::open(path)
            .map(Self::from_connection)
            .map_err(connection_error)
    }

    /// Open an in-memory SQLite database (for testing)
    ///
    /// # Errors
    ///
    /// Returns `Connection` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Connection::open_in_memory()
            .map(Self::from_connection)
            .map_err(connection_error)
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Rc::new(conn),
        }
    }

    /// Enable foreign keys and WAL journaling
    ///
    /// # Errors
    ///
    /// Returns `Connection` if a pragma is rejected.
    pub fn configure(&self) -> Result<()> {
        self.conn
            .pragma_update(None, "foreign_keys", "ON")
            .map_err(connection_error)?;

        // journal_mode answers with the resulting mode ("memory" for in-memory databases)
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(connection_error)?;
        tracing::debug!(journal_mode = %mode, "database configured");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn shared(&self) -> Rc<Connection> {
        Rc::clone(&self.conn)
    }

    /// Names of the user tables, sorted (useful for status output and tests)
    ///
    /// # Errors
    ///
    /// Returns `Store` if `sqlite_master` cannot be read.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' \
                 AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(store_error)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(store_error)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(store_error)?;
        Ok(names)
    }
}

impl Database for SqliteDatabase {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        let tx = self.conn.unchecked_transaction().map_err(connection_error)?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

/// An open SQLite transaction
///
/// Dropping it without commit rolls back (rusqlite's default).
pub struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

fn to_value(arg: &Arg<'_>) -> Value {
    match *arg {
        Arg::Int(v) => Value::Integer(v),
        Arg::Text(s) => Value::Text(s.to_string()),
        Arg::Null => Value::Null,
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn execute_script(&mut self, script: &[u8]) -> Result<()> {
        let sql = std::str::from_utf8(script).map_err(|e| GloatError::Execution {
            message: format!("migration content is not valid UTF-8: {}", e),
        })?;
        self.tx.execute_batch(sql).map_err(execution_error)
    }

    fn execute(&mut self, statement: &str, args: &[Arg<'_>]) -> Result<()> {
        self.tx
            .execute(statement, rusqlite::params_from_iter(args.iter().map(to_value)))
            .map(|_| ())
            .map_err(execution_error)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().map_err(commit_error)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().map_err(execution_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_makes_changes_visible() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut tx = db.begin().unwrap();
        tx.execute_script(b"CREATE TABLE t (id INTEGER)").unwrap();
        tx.execute("INSERT INTO t (id) VALUES (?1)", &[Arg::Int(7)])
            .unwrap();
        tx.commit().unwrap();

        let id: i64 = db
            .connection()
            .query_row("SELECT id FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn test_rollback_discards_changes() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut tx = db.begin().unwrap();
        tx.execute_script(b"CREATE TABLE t (id INTEGER)").unwrap();
        tx.rollback().unwrap();

        assert!(db.table_names().unwrap().is_empty());
    }

    #[test]
    fn test_bad_script_is_execution_error() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut tx = db.begin().unwrap();
        let err = tx.execute_script(b"CREATE TABLE (").unwrap_err();
        assert!(matches!(err, GloatError::Execution { .. }));
    }

    #[test]
    fn test_configure() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.configure().is_ok());
    }
}
