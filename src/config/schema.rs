//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the blog API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and routing settings.
    pub server: ServerConfig,

    /// Document store connection.
    pub database: DatabaseConfig,

    /// Where uploaded images live and how they are served.
    pub uploads: UploadConfig,

    /// Upstream headlines API.
    pub news: NewsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port.
    pub port: u16,

    /// Path prefix the article and news routes are mounted under.
    pub api_prefix: String,

    /// Request body ceiling in bytes (applies to JSON, forms and uploads).
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// `bind_address:port`, ready for `TcpListener::bind`.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            api_prefix: "/api/posts".to_string(),
            max_body_bytes: 30 * 1024 * 1024, // 30MB
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MongoDB connection string.
    pub uri: String,

    /// Database name.
    pub name: String,

    /// Collection holding articles.
    pub collection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            name: "blog".to_string(),
            collection: "articles".to_string(),
        }
    }
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded images are written to.
    pub dir: String,

    /// URL prefix the directory is served under.
    pub url_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            url_prefix: "/uploads".to_string(),
        }
    }
}

/// Headlines API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Full URL of the top-headlines endpoint.
    pub endpoint: String,

    /// API key sent as the `apiKey` query parameter.
    pub api_key: String,

    /// Value of the `sources` query parameter.
    pub sources: String,

    /// Value of the `q` query parameter.
    pub query: String,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            api_key: String::new(),
            sources: "google-news-in".to_string(),
            query: "india".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
