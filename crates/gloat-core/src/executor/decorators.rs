use std::time::Instant;

use super::Executor;
use crate::errors::{GloatError, Result};
use crate::model::Migration;
use crate::store::Store;
use crate::{log_op_end, log_op_error, log_op_start};

/// Wraps an executor with start / end / error events and timings
#[derive(Debug, Clone)]
pub struct LoggingExecutor<E> {
    inner: E,
}

impl<E: Executor> LoggingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn observe<F>(&self, op: &'static str, migration: &Migration, run: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let started = Instant::now();
        log_op_start!(op, version = migration.version, path = migration.path.as_str());

        let result = run();
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!(op, duration_ms = duration_ms, version = migration.version);
            }
            Err(err) => {
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = duration_ms,
                    version = migration.version
                );
            }
        }
        result
    }
}

impl<E: Executor> Executor for LoggingExecutor<E> {
    fn up(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        self.observe("apply", migration, || self.inner.up(migration, store))
    }

    fn down(&self, migration: &Migration, store: &dyn Store) -> Result<()> {
        self.observe("revert", migration, || self.inner.down(migration, store))
    }
}

/// Reports what would run without touching the database or the store
///
/// Irreversible migrations still fail `down`, so a dry run surfaces the
/// same blocker a real revert would.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn up(&self, migration: &Migration, _store: &dyn Store) -> Result<()> {
        tracing::info!(
            version = migration.version,
            path = migration.path.as_str(),
            dry_run = true,
            "would apply migration"
        );
        Ok(())
    }

    fn down(&self, migration: &Migration, _store: &dyn Store) -> Result<()> {
        if !migration.reversible() {
            return Err(GloatError::Irreversible {
                version: migration.version,
            });
        }
        tracing::info!(
            version = migration.version,
            path = migration.path.as_str(),
            dry_run = true,
            "would revert migration"
        );
        Ok(())
    }
}
