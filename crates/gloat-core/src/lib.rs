//! gloat core - migration reconciliation and transactional execution
//!
//! This crate provides:
//! - The `Migration` value and the version-ordered `Migrations` collection
//! - Collaborator contracts (`Source`, `Store`, `Database`, `Transaction`)
//! - The reconciler computing unapplied migrations
//! - `SqlExecutor`, applying or reverting one migration inside a unit of work
//! - The `Gloat` orchestrator for apply-all / revert-current runs
//! - Error and logging facilities shared by the other gloat crates

pub mod cancel;
pub mod clock;
pub mod database;
pub mod errors;
pub mod executor;
pub mod gloat;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod source;
pub mod store;

// Logging macros resolve event names through this path
pub use gloat_core_types::schema;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use clock::{Clock, FixedClock, SystemClock};
pub use database::{Arg, Database, Transaction, UnitOfWork};
pub use errors::{ExError, ExErrorKind, GloatError, Result};
pub use executor::{DryRunExecutor, Executor, LoggingExecutor, SqlExecutor};
pub use gloat::Gloat;
pub use model::{
    generate_migration, version_from_path, Migration, Migrations, DOWN_FILE, UP_FILE,
};
pub use reconcile::{current, unapplied};
pub use source::Source;
pub use store::Store;
