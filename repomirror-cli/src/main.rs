//! repomirror — keep a local mirror of many remote repositories up to date.
//!
//! # Usage
//!
//! ```text
//! repomirror sync [--jobs N] [--all-changes] [--repo owner/name]... [--dest DIR] [--json]
//! repomirror catalog [--catalog-url URL] [--json]
//! ```

mod catalog;
mod commands;
mod report;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{catalog::CatalogArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "repomirror",
    version,
    about = "Clone or update a large set of remote repositories in bounded parallel waves",
    long_about = None,
)]
struct Cli {
    /// Log engine decisions to stderr (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone new repositories and pull updated ones.
    Sync(SyncArgs),

    /// List the repositories published by the remote catalog.
    Catalog(CatalogArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Catalog(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
