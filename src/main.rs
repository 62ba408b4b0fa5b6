//! Blog API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ ┌──────────────────────────────┐
//!                     │ http::server (axum)          │
//!                     │ trace · request id · CORS ·  │
//!                     │ body limit · timeout ·metrics│
//!                     └──────┬───────────┬───────────┘
//!                            │           │
//!               /api/posts/* │           │ /uploads/*
//!                            ▼           ▼
//!          ┌─────────────────────┐   ┌──────────┐
//!          │ upload (extractor)  │   │ ServeDir │
//!          │ multipart → disk    │   └──────────┘
//!          └─────────┬───────────┘
//!                    ▼
//!          ┌─────────────────────┐        ┌────────────────┐
//!          │ http::articles      │        │ http::news     │──▶ headlines API
//!          └─────────┬───────────┘        └────────────────┘
//!                    ▼
//!          ┌─────────────────────┐
//!          │ store (MongoDB)     │
//!          └─────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use blog_api::config::load_config;
use blog_api::lifecycle;
use blog_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "REST backend for the blog: articles, image uploads and a headlines relay", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "BLOG_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        api_prefix = %config.server.api_prefix,
        uploads_dir = %config.uploads.dir,
        "blog-api starting"
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Startup failed, not serving");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
