//! `roster update` command implementation.

use std::path::PathBuf;

use clap::Args;
use roster_config::{CliSettings, Config};
use roster_core::{BlockOutcome, MergeError, Merged, Merger};

use crate::error::CliError;
use crate::output::Output;
use crate::pools::load_pools;

/// Arguments for the update command.
#[derive(Args)]
pub(crate) struct UpdateArgs {
    /// Path to the README (overrides config).
    readme: Option<PathBuf>,

    /// Path to the pools JSON file (overrides config).
    #[arg(short, long, env = "ROSTER_POOLS")]
    pools: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover roster.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cells per table row (overrides config).
    #[arg(long)]
    columns: Option<usize>,

    /// Avatar width in pixels (overrides config).
    #[arg(long)]
    image_size: Option<u32>,

    /// Caption entries with their login instead of their display name.
    #[arg(long)]
    use_username: bool,

    /// Print the updated README instead of writing it.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl UpdateArgs {
    /// Execute the update command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the README or the pools file cannot
    /// be loaded, or the README cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            readme_path: self.readme,
            pools_path: self.pools,
            columns_per_row: self.columns,
            image_size: self.image_size,
            use_username: self.use_username.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let readme_path = &config.paths.readme;

        let content = std::fs::read_to_string(readme_path)?;
        let pools = load_pools(&config.paths.pools)?;
        let templates = config.template.templates();

        output.info(&format!("Updating {}...", readme_path.display()));
        let merged = match Merger::new(&pools, &templates).merge(&content) {
            Ok(merged) => merged,
            Err(MergeError::NoMarkers) => {
                output.warning("No readme markers found, nothing to update.");
                return Ok(());
            }
        };

        print_block_report(&output, &merged);

        if !merged.is_changed() {
            output.success("\nREADME already up to date.");
            return Ok(());
        }

        if self.dry_run {
            output.highlight("\n[DRY RUN] No changes written.\n");
            output.document(&merged.document);
        } else {
            std::fs::write(readme_path, &merged.document)?;
            output.success(&format!("\nUpdated {}", readme_path.display()));
        }

        Ok(())
    }
}

fn print_block_report(output: &Output, merged: &Merged) {
    for block in &merged.blocks {
        match block {
            BlockOutcome::Updated { spec, entity_count } => {
                output.info(&format!("  updated   [{spec}] ({entity_count} entries)"));
            }
            BlockOutcome::Unchanged { spec } => {
                output.detail(&format!("  unchanged [{spec}]"));
            }
            BlockOutcome::Skipped { .. } => {}
        }
    }

    for (spec, error) in merged.skipped() {
        output.warning(&format!("  skipped   [{spec}]: {error}"));
    }
}
