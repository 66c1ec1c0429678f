//! Reconciliation of declared against applied migrations

use crate::errors::Result;
use crate::model::{Migration, Migrations};
use crate::source::Source;
use crate::store::Store;

/// Migrations present on one side only, ascending by version
///
/// Computed as `declared.except(applied)`, which is a symmetric
/// difference: a version recorded in the store but no longer declared by
/// the source shows up here as well, so drift between the two is surfaced
/// rather than hidden.
///
/// # Errors
///
/// Source and store failures are returned unchanged.
pub fn unapplied(source: &dyn Source, store: &dyn Store) -> Result<Migrations> {
    let declared = source.collect()?;
    let applied = store.collect()?;

    let mut pending = declared.except(&applied);
    pending.sort();

    tracing::debug!(
        declared_len = declared.len(),
        applied_len = applied.len(),
        pending_len = pending.len(),
        "reconciled migrations"
    );

    Ok(pending)
}

/// Highest-version applied migration, `None` when nothing is applied
///
/// # Errors
///
/// Store failures are returned unchanged.
pub fn current(store: &dyn Store) -> Result<Option<Migration>> {
    Ok(store.collect()?.current().cloned())
}
