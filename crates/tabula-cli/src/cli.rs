//! Tabula CLI entry point
//!
//! Usage:
//!   tabula filters encode|decode|normalize|validate   - Work with encoded filters
//!   tabula acl check|matrix                           - Inspect access decisions
//!   tabula fields list                                - List registered field types

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tabula_settings::{TabulaSettings, logging};

mod acl;
mod fields;
mod filters;
mod input;

/// Tabula developer tools
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version)]
#[command(about = "Inspect Tabula filters, access policies and field types")]
pub struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, env = "TABULA_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode, decode, normalize and validate filter trees
    #[command(subcommand)]
    Filters(filters::FilterCommand),

    /// Evaluate the access policy
    #[command(subcommand)]
    Acl(acl::AclCommand),

    /// Field type registry
    #[command(subcommand)]
    Fields(fields::FieldCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(logging::LoggingConfig::cli(cli.verbose)) {
        eprintln!("Warning: logging unavailable: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.settings {
        Some(path) => TabulaSettings::load_from(path)?,
        None => TabulaSettings::load()?,
    };

    let output = match cli.command {
        Commands::Filters(command) => filters::run(command, &settings)?,
        Commands::Acl(command) => acl::run(command, &settings)?,
        Commands::Fields(command) => fields::run(command)?,
    };
    println!("{output}");
    Ok(())
}
