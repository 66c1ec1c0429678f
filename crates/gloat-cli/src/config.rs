//! Command-line and environment configuration

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use gloat_core::{GloatError, Result};
use gloat_store::{SqliteDatabase, DEFAULT_TABLE};

const SQLITE_SCHEME: &str = "sqlite://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file, optionally prefixed with sqlite://
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database: Option<String>,

    /// Directory holding one sub-directory per migration
    #[arg(long, env = "DATABASE_SRC", default_value = "db/migrations", global = true)]
    pub src: PathBuf,

    /// Table recording applied versions
    #[arg(long, default_value = DEFAULT_TABLE, global = true)]
    pub table: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,
}

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: Option<PathBuf>,
    pub src: PathBuf,
    pub table: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Self {
        Self {
            database: args.database.as_deref().map(database_path),
            src: args.src.clone(),
            table: args.table.clone(),
            log_format: args.log_format,
        }
    }

    /// # Errors
    ///
    /// `InvalidInput` when neither `--database` nor `DATABASE_URL` is set.
    pub fn database_path(&self) -> Result<&Path> {
        self.database
            .as_deref()
            .ok_or_else(|| GloatError::InvalidInput {
                reason: "no database configured; pass --database or set DATABASE_URL"
                    .to_string(),
            })
    }

    /// Open and configure the target database
    ///
    /// # Errors
    ///
    /// `InvalidInput` without a database, `Connection` if it cannot be opened.
    pub fn open_database(&self) -> Result<SqliteDatabase> {
        let path = self.database_path()?;
        tracing::debug!(database = %path.display(), "opening database");

        let db = SqliteDatabase::open(path)?;
        db.configure()?;
        Ok(db)
    }

    /// Open the target database for reading only
    ///
    /// Nothing is configured and a missing file is not created; it reads
    /// as an empty in-memory database instead.
    ///
    /// # Errors
    ///
    /// `InvalidInput` without a database, `Connection` if it cannot be opened.
    pub fn inspect_database(&self) -> Result<SqliteDatabase> {
        let path = self.database_path()?;
        if !path.exists() {
            tracing::info!(database = %path.display(), "database does not exist yet");
            return SqliteDatabase::open_in_memory();
        }

        tracing::debug!(database = %path.display(), "opening database for inspection");
        SqliteDatabase::open(path)
    }
}

fn database_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix(SQLITE_SCHEME).unwrap_or(url))
}
