pub mod migration;
pub mod migrations;

pub use migration::{generate_migration, version_from_path, Migration, DOWN_FILE, UP_FILE};
pub use migrations::Migrations;
