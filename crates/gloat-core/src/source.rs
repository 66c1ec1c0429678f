//! Source contract: where declared migrations come from

use crate::errors::Result;
use crate::model::Migrations;

/// Produces the full declared migration set
///
/// Implementations may read a directory, embedded assets or anything else;
/// the returned order is irrelevant, reconciliation sorts.
pub trait Source {
    /// Collect every declared migration
    ///
    /// # Errors
    ///
    /// Returns `GloatError::Source` (or a more specific `Io` /
    /// `InvalidVersion`) when the declared set cannot be read.
    fn collect(&self) -> Result<Migrations>;
}
