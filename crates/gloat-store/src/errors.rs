//! Mapping of driver and filesystem failures onto `GloatError`
//!
//! Messages are carried over unchanged so callers see what SQLite or the
//! OS actually said.

use std::path::Path;

use gloat_core::GloatError;

/// Failure to start a transaction
pub fn connection_error(err: rusqlite::Error) -> GloatError {
    GloatError::Connection {
        message: err.to_string(),
    }
}

/// Failure of migration content or a bookkeeping statement
pub fn execution_error(err: rusqlite::Error) -> GloatError {
    GloatError::Execution {
        message: err.to_string(),
    }
}

pub fn commit_error(err: rusqlite::Error) -> GloatError {
    GloatError::Commit {
        message: err.to_string(),
    }
}

/// Failure reading or writing the migrations table
pub fn store_error(err: rusqlite::Error) -> GloatError {
    GloatError::Store {
        message: err.to_string(),
    }
}

/// Re-classify a statement failure raised inside a store call
pub fn into_store_error(err: GloatError) -> GloatError {
    match err {
        GloatError::Execution { message } => GloatError::Store { message },
        other => other,
    }
}

pub fn io_error(path: &Path, err: std::io::Error) -> GloatError {
    GloatError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
