//! `roster inspect` command implementation.

use std::path::PathBuf;

use clap::Args;
use roster_config::{CliSettings, Config};
use roster_core::{Category, Operator, Region, Token, parse_entity_list, parse_spec, scan};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Path to the README (overrides config).
    readme: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover roster.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the README cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            readme_path: self.readme,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let content = std::fs::read_to_string(&config.paths.readme)?;

        let regions = scan(&content);
        if regions.is_empty() {
            output.warning("No readme markers found.");
            return Ok(());
        }

        for region in &regions {
            print_region(&output, region, &content);
        }

        Ok(())
    }
}

fn print_region(output: &Output, region: &Region<'_>, content: &str) {
    output.highlight(&format!("\n[{}]", region.spec));

    match parse_spec(region.spec) {
        Ok(tokens) => {
            let described: Vec<_> = tokens.iter().map(describe_token).collect();
            output.info(&format!("Tokens: {}", described.join(", ")));
        }
        Err(err) => output.warning(&format!("Block will be skipped: {err}")),
    }

    let entities = parse_entity_list(region.content(content));
    if entities.is_empty() {
        output.detail("No entries rendered yet.");
        return;
    }
    output.info(&format!("Entries ({}):", entities.len()));
    for entity in &entities {
        let avatar = entity.avatar_url.as_deref().unwrap_or("-");
        output.info(&format!(
            "  - {} ({}) {avatar}",
            entity.login,
            entity.display_name()
        ));
    }
}

fn describe_token(token: &Token) -> String {
    let category = match token.category() {
        Category::Pool(pool) => format!("pool {}", pool.as_str()),
        Category::Login(login) => format!("login {login:?}"),
    };
    match &token.operator {
        Some(Operator::Exclude) => format!("{category} (exclude)"),
        Some(Operator::Unknown(op)) => format!("{category} (ignored operator {op:?})"),
        None => category,
    }
}
