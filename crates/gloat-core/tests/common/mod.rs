//! Shared test doubles: a recording database, a recording store and a
//! static source. Database and store write to one journal so tests can
//! assert on the exact order of protocol calls.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloat_core::{
    Arg, Database, GloatError, Migration, Migrations, Result, Source, Store, Transaction,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Begin,
    Execute(String),
    Record(i64),
    Remove(i64),
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Which database steps should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct DbFaults {
    pub begin: bool,
    pub execute: bool,
    pub commit: bool,
    pub rollback: bool,
}

/// Database double whose committed scripts become "visible"
#[derive(Debug, Clone, Default)]
pub struct RecordingDatabase {
    pub journal: Journal,
    pub faults: Rc<Cell<DbFaults>>,
    pub visible: Rc<RefCell<Vec<String>>>,
}

impl RecordingDatabase {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn failing(journal: Journal, faults: DbFaults) -> Self {
        let db = Self::new(journal);
        db.faults.set(faults);
        db
    }

    pub fn visible(&self) -> Vec<String> {
        self.visible.borrow().clone()
    }
}

pub struct RecordingTx<'a> {
    db: &'a RecordingDatabase,
    pending: Vec<String>,
}

impl Transaction for RecordingTx<'_> {
    fn execute_script(&mut self, script: &[u8]) -> Result<()> {
        let script = String::from_utf8_lossy(script).into_owned();
        self.db.journal.push(Call::Execute(script.clone()));
        if self.db.faults.get().execute {
            return Err(GloatError::Execution {
                message: format!("near \"{}\": syntax error", script),
            });
        }
        self.pending.push(script);
        Ok(())
    }

    fn execute(&mut self, statement: &str, _args: &[Arg<'_>]) -> Result<()> {
        self.pending.push(statement.to_string());
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.db.journal.push(Call::Commit);
        if self.db.faults.get().commit {
            return Err(GloatError::Commit {
                message: "database is locked".to_string(),
            });
        }
        let RecordingTx { db, pending } = *self;
        db.visible.borrow_mut().extend(pending);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.db.journal.push(Call::Rollback);
        if self.db.faults.get().rollback {
            return Err(GloatError::Connection {
                message: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}

impl Database for RecordingDatabase {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        self.journal.push(Call::Begin);
        if self.faults.get().begin {
            return Err(GloatError::Connection {
                message: "unable to open database file".to_string(),
            });
        }
        Ok(Box::new(RecordingTx {
            db: self,
            pending: Vec::new(),
        }))
    }
}

/// Which store operations should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreFaults {
    pub collect: bool,
    pub record: bool,
    pub remove: bool,
}

/// Store double keeping applied versions in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    pub journal: Journal,
    pub applied: Rc<RefCell<Migrations>>,
    pub faults: StoreFaults,
}

impl RecordingStore {
    pub fn new(journal: Journal, applied: &[i64]) -> Self {
        Self {
            journal,
            applied: Rc::new(RefCell::new(
                applied.iter().copied().map(Migration::with_version).collect(),
            )),
            faults: StoreFaults::default(),
        }
    }

    pub fn with_faults(mut self, faults: StoreFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn applied_versions(&self) -> Vec<i64> {
        self.applied.borrow().versions()
    }
}

impl Store for RecordingStore {
    fn collect(&self) -> Result<Migrations> {
        if self.faults.collect {
            return Err(GloatError::Store {
                message: "no such table: schema_migrations".to_string(),
            });
        }
        Ok(self.applied.borrow().clone())
    }

    fn record(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()> {
        self.journal.push(Call::Record(migration.version));
        if self.faults.record {
            return Err(GloatError::Store {
                message: "UNIQUE constraint failed: schema_migrations.version".to_string(),
            });
        }
        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            &[Arg::Int(migration.version)],
        )?;
        self.applied
            .borrow_mut()
            .push(Migration::with_version(migration.version));
        Ok(())
    }

    fn remove(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()> {
        self.journal.push(Call::Remove(migration.version));
        if self.faults.remove {
            return Err(GloatError::Store {
                message: "disk I/O error".to_string(),
            });
        }
        tx.execute(
            "DELETE FROM schema_migrations WHERE version = ?1",
            &[Arg::Int(migration.version)],
        )?;
        let remaining: Migrations = self
            .applied
            .borrow()
            .iter()
            .filter(|m| m.version != migration.version)
            .cloned()
            .collect();
        *self.applied.borrow_mut() = remaining;
        Ok(())
    }
}

/// Source double returning a fixed declared set
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub declared: Migrations,
    pub fail: bool,
}

impl StaticSource {
    pub fn new(declared: Vec<Migration>) -> Self {
        Self {
            declared: declared.into(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            declared: Migrations::new(),
            fail: true,
        }
    }
}

impl Source for StaticSource {
    fn collect(&self) -> Result<Migrations> {
        if self.fail {
            return Err(GloatError::Source {
                message: "open db/migrations: no such file or directory".to_string(),
            });
        }
        Ok(self.declared.clone())
    }
}

/// A reversible migration with trivially recognisable content
pub fn reversible(version: i64) -> Migration {
    Migration::new(
        version,
        format!("CREATE TABLE t{}", version),
        format!("DROP TABLE t{}", version),
        format!("{}_create_t{}", version, version),
    )
}

/// An irreversible migration (empty down content)
pub fn irreversible(version: i64) -> Migration {
    Migration::new(
        version,
        format!("CREATE TABLE t{}", version),
        "",
        format!("{}_create_t{}", version, version),
    )
}
