//! Executors: apply or revert a single migration
//!
//! [`SqlExecutor`] runs the transactional protocol against a [`Database`].
//! [`LoggingExecutor`] and [`DryRunExecutor`] wrap or stand in for it while
//! honouring the same contract.

mod decorators;

pub use decorators::{DryRunExecutor, LoggingExecutor};

use crate::cancel::CancelToken;
use crate::database::{Database, UnitOfWork};
use crate::errors::{GloatError, Result};
use crate::model::Migration;
use crate::store::Store;

/// Applies and reverts one migration at a time
pub trait Executor {
    /// Apply `migration` and record it in `store`, atomically
    ///
    /// # Errors
    ///
    /// Returns the first failure of begin, execute, record or commit.
    fn up(&self, migration: &Migration, store: &dyn Store) -> Result<()>;

    /// Revert `migration` and remove its record from `store`, atomically
    ///
    /// # Errors
    ///
    /// Returns `Irreversible` for migrations without down content, otherwise
    /// the first failure of begin, execute, remove or commit.
    fn down(&self, migration: &Migration, store: &dyn Store) -> Result<()>;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn up(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        (**self).up(migration, store)
    }

    fn down(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        (**self).down(migration, store)
    }
}

/// Executes migration content inside a database transaction
///
/// Stateless apart from the database handle and an optional cancel token.
/// Each call opens one unit of work, runs the content, lets the store
/// write its bookkeeping through the same transaction and commits. Any
/// failure before the commit rolls the unit of work back first.
#[derive(Debug, Clone)]
pub struct SqlExecutor<D> {
    db: D,
    cancel: Option<CancelToken>,
}

impl<D: Database> SqlExecutor<D> {
    pub fn new(db: D) -> Self {
        Self { db, cancel: None }
    }

    /// Abort (and roll back) once `token` is cancelled or its deadline passes
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    fn checkpoint(&self, version: i64) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GloatError::Cancelled { version }),
            _ => Ok(()),
        }
    }

    fn apply_within(
        &self,
        uow: &mut UnitOfWork<'_>,
        migration: &Migration,
        store: &dyn Store,
    ) -> Result<()> {
        uow.execute_script(&migration.up_sql)?;
        tracing::debug!(version = migration.version, "up content executed");
        self.checkpoint(migration.version)?;

        store.record(migration, uow.transaction())?;
        tracing::debug!(version = migration.version, "migration recorded");
        self.checkpoint(migration.version)
    }

    fn revert_within(
        &self,
        uow: &mut UnitOfWork<'_>,
        migration: &Migration,
        store: &dyn Store,
    ) -> Result<()> {
        uow.execute_script(&migration.down_sql)?;
        tracing::debug!(version = migration.version, "down content executed");
        self.checkpoint(migration.version)?;

        store.remove(migration, uow.transaction())?;
        tracing::debug!(version = migration.version, "migration record removed");
        self.checkpoint(migration.version)
    }
}

impl<D: Database> Executor for SqlExecutor<D> {
    fn up(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        self.checkpoint(migration.version)?;

        let mut uow = UnitOfWork::begin(&self.db)?;
        if let Err(err) = self.apply_within(&mut uow, migration, store) {
            return Err(uow.abort(err));
        }

        uow.commit()
    }

    fn down(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        if !migration.reversible() {
            return Err(GloatError::Irreversible {
                version: migration.version,
            });
        }
        self.checkpoint(migration.version)?;

        let mut uow = UnitOfWork::begin(&self.db)?;
        if let Err(err) = self.revert_within(&mut uow, migration, store) {
            return Err(uow.abort(err));
        }

        uow.commit()
    }
}
