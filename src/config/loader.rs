//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `database.uri`.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable overriding `news.api_key`.
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration: file (or defaults), then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match path {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply overrides looked up through `lookup`.
///
/// Taking the lookup as a function keeps the process environment out of tests.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(ENV_PORT) {
        config.server.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: ENV_PORT,
            message: format!("{}", e),
        })?;
    }
    if let Some(uri) = lookup(ENV_DATABASE_URL) {
        config.database.uri = uri;
    }
    if let Some(key) = lookup(ENV_NEWS_API_KEY) {
        config.news.api_key = key;
    }
    Ok(config)
}
