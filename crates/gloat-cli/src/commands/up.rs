//! Apply pending migrations

use clap::Args;
use gloat_core::Result;

use crate::config::Settings;

#[derive(Debug, Args)]
pub struct UpArgs {
    /// Report what would be applied without changing the database
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(settings: &Settings, args: UpArgs) -> Result<()> {
    let gloat = super::open_gloat(settings, args.dry_run)?;
    let applied = gloat.apply_all()?;

    if applied.is_empty() {
        println!("No pending migrations");
        return Ok(());
    }

    let verb = if args.dry_run { "Would apply" } else { "Applied" };
    for version in applied {
        println!("{} {}", verb, version);
    }
    Ok(())
}
