//! Blog API Library

pub mod article;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod news;
pub mod observability;
pub mod store;
pub mod upload;

pub use article::{Article, ArticleFields, ArticleId};
pub use config::AppConfig;
pub use error::ApiError;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use store::ArticleStore;
