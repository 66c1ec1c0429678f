//! Applied / pending overview

use clap::Args;
use gloat_core::{GloatError, Migration, Result};
use serde::Serialize;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print a JSON document instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Entry {
    version: i64,
    path: String,
}

impl From<&Migration> for Entry {
    fn from(migration: &Migration) -> Self {
        Self {
            version: migration.version,
            path: migration.path.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    current: Option<i64>,
    applied: Vec<Entry>,
    pending: Vec<Entry>,
}

pub fn execute(settings: &Settings, args: StatusArgs) -> Result<()> {
    // read-only view
    let gloat = super::open_gloat(settings, true)?;

    let mut applied = gloat.store.collect()?;
    applied.sort();
    let pending = gloat.unapplied()?;

    let report = StatusReport {
        current: gloat.current()?.map(|m| m.version),
        applied: applied.iter().map(Entry::from).collect(),
        pending: pending.iter().map(Entry::from).collect(),
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| {
            GloatError::InvalidInput {
                reason: format!("cannot render status: {}", e),
            }
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    match report.current {
        Some(version) => println!("Current version: {}", version),
        None => println!("Current version: none"),
    }
    for entry in &report.applied {
        println!("  applied  {}  {}", entry.version, entry.path);
    }
    for entry in &report.pending {
        println!("  pending  {}  {}", entry.version, entry.path);
    }
    Ok(())
}
