//! Client for the upstream top-headlines API.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::config::NewsConfig;

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Headlines request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Headlines API returned status {0}")]
    Upstream(StatusCode),
}

/// Fetches headlines with the configured source, query and key.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NewsError::Client)?;
        Ok(Self { http, config })
    }

    /// Fetch the current headlines and return the upstream JSON untouched.
    pub async fn top_headlines(&self) -> Result<Value, NewsError> {
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("sources", self.config.sources.as_str()),
                ("apiKey", self.config.api_key.as_str()),
                ("q", self.config.query.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Upstream(status));
        }

        let body = response.json::<Value>().await?;
        tracing::debug!(status = %status, "Fetched headlines");
        Ok(body)
    }
}
