//! Migration generation command

use clap::Args;
use gloat_core::{generate_migration, Result, SystemClock};
use gloat_store::write_migration;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Migration name, e.g. CreateUsers or create_users
    pub name: String,
}

pub fn execute(settings: &Settings, args: NewArgs) -> Result<()> {
    let migration = generate_migration(&args.name, &SystemClock)?;
    let dir = write_migration(&settings.src, &migration)?;

    println!("Created {}", dir.display());
    Ok(())
}
