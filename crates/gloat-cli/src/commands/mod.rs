pub mod down;
pub mod new;
pub mod status;
pub mod up;

use gloat_core::{DryRunExecutor, Gloat, LoggingExecutor, Result, SqlExecutor};
use gloat_store::{FileSystemSource, SqliteStore};

use crate::config::Settings;

/// Wire the filesystem source, SQLite store and executor for one run
///
/// A dry run (also used by `status`) only reads: the database is neither
/// created nor configured and the migrations table is not created.
pub(crate) fn open_gloat(settings: &Settings, dry_run: bool) -> Result<Gloat<'static>> {
    let source = FileSystemSource::new(&settings.src);

    if dry_run {
        let db = settings.inspect_database()?;
        let store = SqliteStore::open_existing(&db, &settings.table)?;
        return Ok(Gloat::new(
            source,
            store,
            LoggingExecutor::new(DryRunExecutor),
        ));
    }

    let db = settings.open_database()?;
    let store = SqliteStore::new(&db, &settings.table)?;
    Ok(Gloat::new(
        source,
        store,
        LoggingExecutor::new(SqlExecutor::new(db)),
    ))
}
