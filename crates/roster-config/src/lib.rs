//! Configuration management for roster.
//!
//! Parses `roster.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [readme]
//! path = "README.md"
//!
//! [pools]
//! path = "${ROSTER_POOLS:-pools.json}"
//!
//! [template]
//! columns_per_row = 6
//! image_size = 100
//!
//! [[template.blocks]]
//! spec = "sponsors"
//! columns_per_row = 4
//! ```
//!
//! Paths are resolved relative to the config file and support `~`, `$VAR`,
//! `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use std::path::{Path, PathBuf};

use roster_core::{DEFAULT_COLUMNS_PER_ROW, DEFAULT_IMAGE_SIZE, Template, Templates};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override README path.
    pub readme_path: Option<PathBuf>,
    /// Override pools file path.
    pub pools_path: Option<PathBuf>,
    /// Override default columns per row.
    pub columns_per_row: Option<usize>,
    /// Override default avatar size.
    pub image_size: Option<u32>,
    /// Override default caption mode.
    pub use_username: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "roster.toml";

const DEFAULT_README_PATH: &str = "README.md";
const DEFAULT_POOLS_PATH: &str = "pools.json";

/// Upper bound for `columns_per_row`.
const MAX_COLUMNS_PER_ROW: usize = 50;

/// Upper bound for `image_size`.
const MAX_IMAGE_SIZE: u32 = 1000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// README location (path is a relative string from TOML).
    readme: PathConfigRaw,
    /// Pools file location (path is a relative string from TOML).
    pools: PathConfigRaw,
    /// Rendering configuration.
    pub template: TemplateConfig,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw path section as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathConfigRaw {
    path: Option<String>,
}

/// Resolved file locations.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// README file to update.
    pub readme: PathBuf,
    /// JSON file with the entity pools.
    pub pools: PathBuf,
}

/// Default rendering parameters plus per-block overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Cells per table row.
    pub columns_per_row: usize,
    /// Avatar width in pixels.
    pub image_size: u32,
    /// Caption with the login instead of the display name.
    pub use_username: bool,
    /// Overrides for blocks with a given spec.
    pub blocks: Vec<BlockTemplateConfig>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            columns_per_row: DEFAULT_COLUMNS_PER_ROW,
            image_size: DEFAULT_IMAGE_SIZE,
            use_username: false,
            blocks: Vec::new(),
        }
    }
}

/// Rendering overrides for one block, matched by its spec text.
#[derive(Debug, Deserialize)]
pub struct BlockTemplateConfig {
    /// Spec text of the block, e.g. `"contributors,bots"`.
    pub spec: String,
    pub columns_per_row: Option<usize>,
    pub image_size: Option<u32>,
    pub use_username: Option<bool>,
}

impl TemplateConfig {
    /// Template used for blocks without an override.
    #[must_use]
    pub fn default_template(&self) -> Template {
        Template {
            columns_per_row: self.columns_per_row,
            image_size: self.image_size,
            use_username: self.use_username,
        }
    }

    /// Build the template lookup used by the merger.
    #[must_use]
    pub fn templates(&self) -> Templates {
        let default = self.default_template();
        self.blocks
            .iter()
            .fold(Templates::new(default.clone()), |templates, block| {
                let template = Template {
                    columns_per_row: block.columns_per_row.unwrap_or(default.columns_per_row),
                    image_size: block.image_size.unwrap_or(default.image_size),
                    use_username: block.use_username.unwrap_or(default.use_username),
                };
                templates.with_block(&block.spec, template)
            })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`pools.path`").
        field: String,
        /// Error message (e.g., "${`ROSTER_POOLS`} not set").
        message: String,
    },
}

/// Require a value to lie within `1..=max`.
fn require_in_range<T>(value: T, max: T, field: &str) -> Result<(), ConfigError>
where
    T: PartialOrd + From<u8> + std::fmt::Display,
{
    if value < T::from(1) || value > max {
        return Err(ConfigError::Validation(format!(
            "{field} must be between 1 and {max}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `roster.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(readme) = &settings.readme_path {
            self.paths.readme.clone_from(readme);
        }
        if let Some(pools) = &settings.pools_path {
            self.paths.pools.clone_from(pools);
        }
        if let Some(columns_per_row) = settings.columns_per_row {
            self.template.columns_per_row = columns_per_row;
        }
        if let Some(image_size) = settings.image_size {
            self.template.image_size = image_size;
        }
        if let Some(use_username) = settings.use_username {
            self.template.use_username = use_username;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            readme: PathConfigRaw::default(),
            pools: PathConfigRaw::default(),
            template: TemplateConfig::default(),
            paths: PathsConfig {
                readme: base.join(DEFAULT_README_PATH),
                pools: base.join(DEFAULT_POOLS_PATH),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let template = &self.template;
        require_in_range(
            template.columns_per_row,
            MAX_COLUMNS_PER_ROW,
            "template.columns_per_row",
        )?;
        require_in_range(template.image_size, MAX_IMAGE_SIZE, "template.image_size")?;

        for block in &template.blocks {
            if block.spec.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "template.blocks.spec cannot be empty".to_owned(),
                ));
            }
            if let Some(columns_per_row) = block.columns_per_row {
                require_in_range(
                    columns_per_row,
                    MAX_COLUMNS_PER_ROW,
                    "template.blocks.columns_per_row",
                )?;
            }
            if let Some(image_size) = block.image_size {
                require_in_range(image_size, MAX_IMAGE_SIZE, "template.blocks.image_size")?;
            }
        }

        Ok(())
    }

    /// Expand and resolve file paths relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |raw: Option<&str>, default: &str, field: &str| {
            let path = match raw {
                Some(raw) => expand::expand_path(raw, field)?,
                None => default.to_owned(),
            };
            Ok::<_, ConfigError>(config_dir.join(path))
        };

        self.paths = PathsConfig {
            readme: resolve(self.readme.path.as_deref(), DEFAULT_README_PATH, "readme.path")?,
            pools: resolve(self.pools.path.as_deref(), DEFAULT_POOLS_PATH, "pools.path")?,
        };

        Ok(())
    }
}
