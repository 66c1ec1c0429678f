//! Database contract and the unit of work built on it
//!
//! The executor only ever needs begin / execute / commit / rollback. The
//! same `Transaction` handle is lent to the store so the bookkeeping write
//! lands in the transaction that carries the schema change.

use crate::errors::{GloatError, Result};

/// Bound parameter for a bookkeeping statement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Text(&'a str),
    Null,
}

/// An open database transaction
///
/// `commit` and `rollback` consume the handle, so each transaction ends
/// exactly once.
pub trait Transaction {
    /// Execute migration content, possibly several statements
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Execution` carrying the driver's message.
    fn execute_script(&mut self, script: &[u8]) -> Result<()>;

    /// Execute one parameterised statement
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Execution` carrying the driver's message.
    fn execute(&mut self, statement: &str, args: &[Arg<'_>]) -> Result<()>;

    /// # Errors
    ///
    /// Returns `GloatError::Commit`; the end state is then unknown.
    fn commit(self: Box<Self>) -> Result<()>;

    /// # Errors
    ///
    /// Returns the driver's failure to roll back.
    fn rollback(self: Box<Self>) -> Result<()>;
}

/// A target database able to start transactions
pub trait Database {
    /// # Errors
    ///
    /// Returns `GloatError::Connection` when no transaction can be started.
    fn begin(&self) -> Result<Box<dyn Transaction + '_>>;
}

impl<D: Database + ?Sized> Database for &D {
    fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        (**self).begin()
    }
}

/// Scoped transactional context for one migration
///
/// Acquired by the executor, lent to the store through [`transaction`],
/// finished by [`commit`] or [`rollback`]. Dropping an unfinished unit of
/// work rolls it back, so every early exit releases the transaction.
///
/// [`transaction`]: UnitOfWork::transaction
/// [`commit`]: UnitOfWork::commit
/// [`rollback`]: UnitOfWork::rollback
pub struct UnitOfWork<'db> {
    tx: Option<Box<dyn Transaction + 'db>>,
}

impl<'db> UnitOfWork<'db> {
    /// Begin a transaction on `db`
    ///
    /// # Errors
    ///
    /// Propagates the database's `Connection` error; nothing is left open.
    pub fn begin<D: Database + ?Sized>(db: &'db D) -> Result<Self> {
        Ok(Self {
            tx: Some(db.begin()?),
        })
    }

    /// The open transaction, to hand to a store
    pub fn transaction(&mut self) -> &mut (dyn Transaction + 'db) {
        match self.tx.as_deref_mut() {
            Some(tx) => tx,
            // commit/rollback consume self, so the handle is always present here
            None => unreachable!("unit of work used after it finished"),
        }
    }

    /// # Errors
    ///
    /// Returns `GloatError::Execution` from the transaction.
    pub fn execute_script(&mut self, script: &[u8]) -> Result<()> {
        self.transaction().execute_script(script)
    }

    /// # Errors
    ///
    /// Returns `GloatError::Commit` from the transaction.
    pub fn commit(mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx.commit(),
            None => Ok(()),
        }
    }

    /// # Errors
    ///
    /// Returns the transaction's rollback failure.
    pub fn rollback(mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx.rollback(),
            None => Ok(()),
        }
    }

    /// Roll back because of `cause` and return the error to surface
    ///
    /// A failed rollback is logged and attached to `cause` as a secondary
    /// error rather than dropped.
    pub fn abort(self, cause: GloatError) -> GloatError {
        match self.rollback() {
            Ok(()) => cause,
            Err(rollback_err) => {
                tracing::warn!(
                    error = %rollback_err,
                    cause = %cause,
                    "rollback failed after migration error"
                );
                cause.with_rollback_failure(rollback_err.to_string())
            }
        }
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(err) = tx.rollback() {
                tracing::warn!(error = %err, "rollback of abandoned unit of work failed");
            }
        }
    }
}
