//! CLI error types.

use roster_config::ConfigError;

use crate::pools::PoolsError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pools(#[from] PoolsError),
}
