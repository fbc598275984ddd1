//! nsite CLI - page collections for CMS-backed static sites.
//!
//! Provides commands for:
//! - `build`: Run a generation pass and write `collections.json`
//! - `collections`: Run a generation pass and list the registered collections

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CollectionsArgs};
use output::Output;

/// nsite - page collections for CMS-backed static sites.
#[derive(Parser)]
#[command(name = "nsite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generation pass and write every collection to the output directory.
    Build(BuildArgs),
    /// Run a generation pass and list the registered collections.
    Collections(CollectionsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.pass.verbose,
            Self::Collections(args) => args.pass.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Collections(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
