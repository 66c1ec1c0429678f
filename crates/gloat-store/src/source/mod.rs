//! Sources of declared migrations

mod embedded;
mod fs;

pub use embedded::{EmbeddedMigration, EmbeddedSource};
pub use fs::FileSystemSource;
