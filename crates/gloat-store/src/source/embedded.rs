use std::path::Path;

use gloat_core::{Migration, Migrations, Result, Source, DOWN_FILE, UP_FILE};

/// A migration compiled into the binary
///
/// Typically built with `include_str!`:
///
/// ```ignore
/// EmbeddedMigration {
///     path: "20170329154959_create_users",
///     up: include_str!("../migrations/20170329154959_create_users/up.sql"),
///     down: Some(include_str!("../migrations/20170329154959_create_users/down.sql")),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedMigration {
    pub path: &'static str,
    pub up: &'static str,
    pub down: Option<&'static str>,
}

impl EmbeddedMigration {
    fn asset(&self, file: &Path) -> std::result::Result<Vec<u8>, String> {
        let content = match file.file_name().and_then(|name| name.to_str()) {
            Some(UP_FILE) => Some(self.up),
            Some(DOWN_FILE) => self.down,
            _ => None,
        };
        content
            .map(|sql| sql.as_bytes().to_vec())
            .ok_or_else(|| format!("asset {} not found", file.display()))
    }
}

/// Source over a static table of embedded migrations
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    migrations: &'static [EmbeddedMigration],
}

impl EmbeddedSource {
    pub fn new(migrations: &'static [EmbeddedMigration]) -> Self {
        Self { migrations }
    }
}

impl Source for EmbeddedSource {
    fn collect(&self) -> Result<Migrations> {
        self.migrations
            .iter()
            .map(|embedded| Migration::from_reader(embedded.path, |file| embedded.asset(file)))
            .collect()
    }
}
