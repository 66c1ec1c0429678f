use std::path::{Path, PathBuf};

use gloat_core::{version_from_path, GloatError, Migration, Migrations, Result, Source};

/// Migrations laid out as `<root>/<version>_<name>/{up,down}.sql`
///
/// Each sub-directory (or symlink to one) whose name starts with a version
/// is a migration. Plain files and other directories are ignored; a path
/// that is not valid UTF-8 is rejected rather than guessed at.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for FileSystemSource {
    fn collect(&self) -> Result<Migrations> {
        let unavailable = |e: std::io::Error| GloatError::Source {
            message: format!("open {}: {}", self.root.display(), e),
        };

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            // is_dir follows symlinks, so linked migration directories count
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut declared = Migrations::new();
        for dir in dirs {
            let path = dir.to_str().ok_or_else(|| GloatError::InvalidVersion {
                path: dir.display().to_string(),
            })?;
            if version_from_path(path).is_err() {
                tracing::debug!(path, "skipping directory without version prefix");
                continue;
            }
            declared.push(Migration::from_reader(path, |file| std::fs::read(file))?);
        }

        tracing::debug!(
            root = %self.root.display(),
            declared_len = declared.len(),
            "collected migrations from filesystem"
        );
        Ok(declared)
    }
}
