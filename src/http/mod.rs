//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID on the tracing span)
//!     → articles.rs (CRUD handlers → ArticleStore)
//!     → news.rs (headlines relay → NewsClient)
//!     → crate::error::ApiError (uniform error envelope)
//! ```

pub mod articles;
pub mod news;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
