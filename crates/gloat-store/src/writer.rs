//! Laying generated migrations out on disk

use std::path::{Path, PathBuf};

use gloat_core::{GloatError, Migration, Result, DOWN_FILE, UP_FILE};

use crate::errors::io_error;

/// Write `migration` as `<root>/<path>/{up,down}.sql` and return the directory
///
/// `root` is created if needed. An existing migration directory is never
/// overwritten.
///
/// # Errors
///
/// `InvalidInput` for a migration without a path or whose directory already
/// exists, `Io` for filesystem failures.
pub fn write_migration(root: &Path, migration: &Migration) -> Result<PathBuf> {
    if !migration.persistable() {
        return Err(GloatError::InvalidInput {
            reason: format!("migration {} has no path to write to", migration.version),
        });
    }

    let dir = root.join(&migration.path);
    if dir.exists() {
        return Err(GloatError::InvalidInput {
            reason: format!("{} already exists", dir.display()),
        });
    }
    std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

    for (file, content) in [(UP_FILE, &migration.up_sql), (DOWN_FILE, &migration.down_sql)] {
        let target = dir.join(file);
        std::fs::write(&target, content).map_err(|e| io_error(&target, e))?;
    }

    tracing::info!(
        version = migration.version,
        path = %dir.display(),
        "migration written"
    );
    Ok(dir)
}
