//! Orchestrator wiring a source, a store and an executor together

use std::time::Instant;

use gloat_core_types::RunId;

use crate::errors::{GloatError, Result};
use crate::executor::Executor;
use crate::model::{Migration, Migrations};
use crate::reconcile;
use crate::source::Source;
use crate::store::Store;
use crate::{log_op_end, log_op_error, log_op_start};

/// Entry point for "apply everything pending" and "revert the current one"
///
/// There is no locking around a run. Two processes reconciling the same
/// database at once can both try to apply the same migration; deployments
/// running concurrently must serialize externally.
pub struct Gloat<'a> {
    pub source: Box<dyn Source + 'a>,
    pub store: Box<dyn Store + 'a>,
    pub executor: Box<dyn Executor + 'a>,
}

impl<'a> Gloat<'a> {
    pub fn new(
        source: impl Source + 'a,
        store: impl Store + 'a,
        executor: impl Executor + 'a,
    ) -> Self {
        Self {
            source: Box::new(source),
            store: Box::new(store),
            executor: Box::new(executor),
        }
    }

    /// Pending migrations, ascending; see [`reconcile::unapplied`]
    ///
    /// # Errors
    ///
    /// Source and store failures are returned unchanged.
    pub fn unapplied(&self) -> Result<Migrations> {
        reconcile::unapplied(self.source.as_ref(), self.store.as_ref())
    }

    /// Highest-version applied migration, as recorded by the store
    ///
    /// # Errors
    ///
    /// Store failures are returned unchanged.
    pub fn current(&self) -> Result<Option<Migration>> {
        reconcile::current(self.store.as_ref())
    }

    /// The declared migration with `version`, content included
    ///
    /// # Errors
    ///
    /// `NotDeclared` when the source has no such version.
    pub fn lookup(&self, version: i64) -> Result<Migration> {
        self.source
            .collect()?
            .into_iter()
            .find(|m| m.version == version)
            .ok_or(GloatError::NotDeclared { version })
    }

    /// # Errors
    ///
    /// Whatever the executor returns.
    pub fn apply(&self, migration: &Migration) -> Result<()> {
        self.executor.up(migration, self.store.as_ref())
    }

    /// # Errors
    ///
    /// Whatever the executor returns.
    pub fn revert(&self, migration: &Migration) -> Result<()> {
        self.executor.down(migration, self.store.as_ref())
    }

    /// Apply every pending migration in ascending version order
    ///
    /// Stops at the first failure, since later migrations may depend on
    /// earlier ones. Returns the versions applied.
    ///
    /// # Errors
    ///
    /// The first reconciliation or executor failure.
    pub fn apply_all(&self) -> Result<Vec<i64>> {
        let run_id = RunId::new();
        let span = tracing::info_span!("gloat_run", run_id = %run_id);
        let _entered = span.enter();
        let started = Instant::now();

        let pending = self.unapplied()?;
        log_op_start!("apply_all", pending_len = pending.len());

        let mut applied = Vec::with_capacity(pending.len());
        for migration in &pending {
            if let Err(err) = self.apply(migration) {
                log_op_error!(
                    "apply_all",
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    version = migration.version
                );
                return Err(err);
            }
            applied.push(migration.version);
        }

        log_op_end!(
            "apply_all",
            duration_ms = started.elapsed().as_millis() as u64,
            applied_len = applied.len()
        );
        Ok(applied)
    }

    /// Revert the highest-version applied migration
    ///
    /// The store only knows versions, so the content is looked up in the
    /// source. Returns `None` when nothing is applied.
    ///
    /// # Errors
    ///
    /// `NotDeclared` if the current migration is no longer declared,
    /// otherwise the executor's error.
    pub fn revert_current(&self) -> Result<Option<Migration>> {
        let run_id = RunId::new();
        let span = tracing::info_span!("gloat_run", run_id = %run_id);
        let _entered = span.enter();

        let Some(current) = self.current()? else {
            tracing::info!("no applied migration to revert");
            return Ok(None);
        };

        let migration = self.lookup(current.version)?;
        self.revert(&migration)?;
        Ok(Some(migration))
    }
}
