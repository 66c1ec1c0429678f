//! gloat CLI
//!
//! Command-line interface for reconciling and running schema migrations

use clap::{Parser, Subcommand};
use gloat_core::logging_facility::{self, Profile};
use gloat_core::ExError;

mod commands;
mod config;

use config::{GlobalArgs, LogFormat, Settings};

#[derive(Debug, Parser)]
#[command(name = "gloat")]
#[command(about = "gloat - Schema migrations for SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a new, empty migration in the source directory
    New(commands::new::NewArgs),
    /// Apply every pending migration
    Up(commands::up::UpArgs),
    /// Revert the most recently applied migration
    Down(commands::down::DownArgs),
    /// Show applied and pending migrations
    Status(commands::status::StatusArgs),
}

fn main() {
    // A missing .env is fine; explicit flags and the environment still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_args(&cli.global);

    logging_facility::init(match settings.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::New(args) => commands::new::execute(&settings, args),
        Commands::Up(args) => commands::up::execute(&settings, args),
        Commands::Down(args) => commands::down::execute(&settings, args),
        Commands::Status(args) => commands::status::execute(&settings, args),
    };

    if let Err(e) = result {
        let err = ExError::from(e);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
