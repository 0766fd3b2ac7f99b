//! Roster CLI - README contributor sections.
//!
//! Provides commands for:
//! - `update`: Re-render every marker block in a README from a pools file
//! - `inspect`: Show the marker blocks of a README and what they currently list

mod commands;
mod error;
mod output;
mod pools;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InspectArgs, UpdateArgs};
use output::Output;

/// Roster - README contributor sections.
#[derive(Parser)]
#[command(name = "roster", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the marker blocks of a README.
    Update(UpdateArgs),
    /// List marker blocks and the entities they currently show.
    Inspect(InspectArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Update(args) if args.verbose);

    // --verbose enables INFO level, otherwise RUST_LOG decides
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Update(args) => args.execute(),
        Commands::Inspect(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
