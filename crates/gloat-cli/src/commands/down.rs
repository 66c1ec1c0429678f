//! Revert the current migration

use clap::Args;
use gloat_core::Result;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct DownArgs {
    /// Report what would be reverted without changing the database
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(settings: &Settings, args: DownArgs) -> Result<()> {
    let gloat = super::open_gloat(settings, args.dry_run)?;

    match gloat.revert_current()? {
        Some(migration) => {
            let verb = if args.dry_run { "Would revert" } else { "Reverted" };
            println!("{} {} ({})", verb, migration.version, migration.path);
        }
        None => println!("No applied migrations"),
    }
    Ok(())
}
