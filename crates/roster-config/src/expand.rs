//! Shell-style expansion of configuration strings.

use crate::ConfigError;

/// Expand `~`, `$VAR`, `${VAR}` and `${VAR:-default}` in a config value.
///
/// `field` names the config field in error messages.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
