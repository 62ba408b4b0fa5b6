//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers, registered once at construction
//! - Wire up middleware (tracing, request ID, CORS, body limit, timeout, metrics)
//! - Serve the uploads directory as static files
//! - Bind server to listener and run until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, FromRef},
    handler::HandlerWithoutStateExt,
    http::Uri,
    middleware,
    routing::get,
    BoxError, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::http::{articles, news, request};
use crate::news::NewsClient;
use crate::observability::metrics;
use crate::store::ArticleStore;
use crate::upload::ImageStorage;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleStore>,
    pub images: ImageStorage,
    pub news: Arc<NewsClient>,
}

impl AppState {
    pub fn new(articles: Arc<dyn ArticleStore>, images: ImageStorage, news: NewsClient) -> Self {
        Self {
            articles,
            images,
            news: Arc::new(news),
        }
    }
}

impl FromRef<AppState> for ImageStorage {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}

/// HTTP server for the blog API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Unmatched routes, missing upload files and timed out requests all
    /// answer with the JSON error envelope.
    pub fn build_router(config: &AppConfig, state: AppState) -> Router {
        let api = Router::new()
            .merge(articles::routes())
            .merge(news::routes());
        let uploads =
            ServeDir::new(state.images.dir()).not_found_service(route_not_found.into_service());
        let timeout = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.timeouts.request_secs));

        Router::new()
            .route("/", get(root))
            .nest(&config.server.api_prefix, api)
            .nest_service(&config.uploads.url_prefix, uploads)
            .fallback(route_not_found)
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
            .layer(CorsLayer::permissive())
            .layer(timeout)
            .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.config.server.api_prefix,
            uploads = %self.config.uploads.url_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn root() -> &'static str {
    "Hello World!"
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

// The router itself is infallible, so the deadline is the only error source.
async fn handle_timeout(err: BoxError) -> ApiError {
    tracing::debug!(error = %err, "Request deadline elapsed");
    ApiError::Timeout
}
