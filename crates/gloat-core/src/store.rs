//! Store contract: bookkeeping of applied migrations

use crate::database::Transaction;
use crate::errors::Result;
use crate::model::{Migration, Migrations};

/// Persists which migrations have been applied
///
/// `record` and `remove` run inside the transaction the executor hands in
/// and must never open one of their own: that shared handle is what makes
/// the schema change and its bookkeeping commit or roll back together.
pub trait Store {
    /// All migrations currently recorded as applied, any order
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Store` when the bookkeeping cannot be read.
    fn collect(&self) -> Result<Migrations>;

    /// Record `migration` as applied within `tx`
    ///
    /// Duplicate records are the store's concern.
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Store` when the write fails.
    fn record(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()>;

    /// Remove the record for `migration` within `tx`
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Store` when the write fails.
    fn remove(&self, migration: &Migration, tx: &mut dyn Transaction) -> Result<()>;
}
