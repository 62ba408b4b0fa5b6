//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port != 0, body limit > 0)
//! - Check URL and path prefix shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::new("server.port", "Port cannot be 0"));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "server.max_body_bytes",
            "Body limit must be greater than 0",
        ));
    }
    check_prefix("server.api_prefix", &config.server.api_prefix, &mut errors);
    check_prefix("uploads.url_prefix", &config.uploads.url_prefix, &mut errors);

    check_not_blank("database.uri", &config.database.uri, &mut errors);
    check_not_blank("database.name", &config.database.name, &mut errors);
    check_not_blank("database.collection", &config.database.collection, &mut errors);
    check_not_blank("uploads.dir", &config.uploads.dir, &mut errors);

    match url::Url::parse(&config.news.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "news.endpoint",
            format!("Unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "news.endpoint",
            format!("Invalid URL: {}", e),
        )),
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!(
                "Expected 'pretty' or 'json', got '{}'",
                config.observability.log_format
            ),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "Invalid socket address '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_not_blank(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "Cannot be empty"));
    }
}

/// Mount prefixes must be absolute and must not be the root itself.
fn check_prefix(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::new(field, "Must start with '/'"));
    } else if value.len() == 1 || value.ends_with('/') {
        errors.push(ValidationError::new(field, "Must not be '/' or end with '/'"));
    }
}
