use std::fmt::Display;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, Timelike};
use regex::Regex;

use crate::clock::Clock;
use crate::errors::{GloatError, Result};

/// File holding the forward change inside a migration directory
pub const UP_FILE: &str = "up.sql";
/// File holding the reverse change inside a migration directory
pub const DOWN_FILE: &str = "down.sql";

/// One versioned schema change
///
/// The version orders migrations and identifies them in a store. The path
/// is where the migration came from (`<version>_<name>`), blank for ad hoc
/// migrations built in code. Values are built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Migration {
    /// Forward change, executed by apply
    pub up_sql: Vec<u8>,

    /// Reverse change, executed by revert; empty means irreversible
    pub down_sql: Vec<u8>,

    /// Locator of the migration, e.g. `20170329154959_create_users`
    pub path: String,

    /// Ordering key, typically a `YYYYMMDDHHMMSS` timestamp
    pub version: i64,
}

impl Migration {
    pub fn new(
        version: i64,
        up_sql: impl Into<Vec<u8>>,
        down_sql: impl Into<Vec<u8>>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            up_sql: up_sql.into(),
            down_sql: down_sql.into(),
            path: path.into(),
            version,
        }
    }

    /// A bare migration carrying only its version, as returned by stores
    pub fn with_version(version: i64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// True if the down content is present
    pub fn reversible(&self) -> bool {
        !self.down_sql.is_empty()
    }

    /// True for migrations with a non-blank path (file or asset backed)
    pub fn persistable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Build a migration from a directory locator and a byte reader
    ///
    /// `read` is called with `<path>/up.sql` and `<path>/down.sql`. Any
    /// function with the shape of `std::fs::read` works, as does a lookup
    /// into compile-time embedded assets.
    ///
    /// # Errors
    ///
    /// `InvalidVersion` if the directory name has no numeric prefix, `Io` if
    /// the up file cannot be read. A missing down file is not an error: the
    /// migration is simply irreversible.
    pub fn from_reader<F, E>(path: &str, mut read: F) -> Result<Self>
    where
        F: FnMut(&Path) -> std::result::Result<Vec<u8>, E>,
        E: Display,
    {
        let version = version_from_path(path)?;

        let up_path = Path::new(path).join(UP_FILE);
        let up_sql = read(&up_path).map_err(|e| GloatError::Io {
            path: up_path.display().to_string(),
            message: e.to_string(),
        })?;

        let down_sql = read(&Path::new(path).join(DOWN_FILE)).unwrap_or_default();

        Ok(Self {
            up_sql,
            down_sql,
            path: path.to_string(),
            version,
        })
    }
}

/// Extract the version from a migration locator
///
/// The version is everything before the first `_` of the base name, so
/// `db/migrations/20170329154959_create_users` yields `20170329154959`.
///
/// # Errors
///
/// Returns `InvalidVersion` when that prefix is not an integer.
pub fn version_from_path(path: &str) -> Result<i64> {
    let invalid = || GloatError::InvalidVersion {
        path: path.to_string(),
    };

    let base = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;

    let prefix = base.split('_').next().unwrap_or_default();
    prefix.parse::<i64>().map_err(|_| invalid())
}

/// Generate a blank migration named after `name`
///
/// The version comes from the clock's current UTC time as
/// `YYYYMMDDHHMMSS`; the path is `<version>_<snake_case name>`. Up and down
/// content start empty.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank name or one containing a path
/// separator.
pub fn generate_migration(name: &str, clock: &dyn Clock) -> Result<Migration> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GloatError::InvalidInput {
            reason: "migration name cannot be empty".to_string(),
        });
    }
    if name.contains(['/', '\\']) {
        return Err(GloatError::InvalidInput {
            reason: format!("migration name '{}' cannot contain a path separator", name),
        });
    }

    let version = generate_version(clock);
    let path = format!("{}_{}", version, normalize_name(name));

    Ok(Migration {
        path,
        version,
        ..Migration::default()
    })
}

fn generate_version(clock: &dyn Clock) -> i64 {
    let now = clock.now();
    i64::from(now.year()) * 10_000_000_000
        + i64::from(now.month()) * 100_000_000
        + i64::from(now.day()) * 1_000_000
        + i64::from(now.hour()) * 10_000
        + i64::from(now.minute()) * 100
        + i64::from(now.second())
}

fn normalize_name(name: &str) -> String {
    static CAMEL_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let re = CAMEL_BOUNDARY
        .get_or_init(|| Regex::new("([a-z])([A-Z])").expect("static pattern compiles"));
    re.replace_all(name, "${1}_${2}")
        .to_lowercase()
        .replace(char::is_whitespace, "_")
}
