//! `${VAR}` expansion in configuration strings.

use crate::ConfigError;

/// Lookup failure for a variable without a default.
struct Unset(String);

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// An unset variable without a default is an error naming `field`. Strings
/// without `${` are returned as-is, so a lone `$VAR` survives.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| -> Result<Option<String>, Unset> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| Unset(var.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}
