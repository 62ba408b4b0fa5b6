//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the document store (ping before anything else)
//! - Prepare the uploads directory and the headlines client
//! - Bind the listener last, so traffic only arrives once the store is reachable
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and nothing listens

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{shutdown_signal, Shutdown};
use crate::news::{NewsClient, NewsError};
use crate::observability::metrics;
use crate::store::{MongoArticleStore, StoreError};
use crate::upload::ImageStorage;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to connect to document store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to prepare uploads directory {dir}: {source}")]
    Uploads {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create headlines client: {0}")]
    News(#[from] NewsError),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Bring every subsystem up in order and serve until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let store = MongoArticleStore::connect(&config.database).await?;

    let images = ImageStorage::from_config(&config.uploads);
    images.prepare().await.map_err(|source| StartupError::Uploads {
        dir: config.uploads.dir.clone(),
        source,
    })?;

    let news = NewsClient::new(config.news.clone())?;
    if config.news.api_key.is_empty() {
        tracing::warn!("news.api_key is empty; /top-news requests will be rejected upstream");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = AppState::new(Arc::new(store), images, news);

    let address = config.server.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, state)
        .run(listener, server_shutdown)
        .await?;
    Ok(())
}
