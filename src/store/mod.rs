//! Article storage subsystem.
//!
//! # Data Flow
//! ```text
//! handlers
//!     → ArticleStore (trait object shared via Arc)
//!         → mongo.rs (MongoDB collection, production)
//!         → memory.rs (process-local, tests)
//! ```
//!
//! # Design Decisions
//! - The store owns id parsing: a malformed id is a lookup failure, not "not found"
//! - `save` replaces the whole document; concurrent writers race, last write wins
//! - `save` on a document deleted since it was loaded fails with `Missing`
//! - `delete` succeeds whether or not a document matched

pub mod memory;
pub mod mongo;

use std::future::Future;
use std::pin::Pin;

use crate::article::{Article, ArticleFields, ArticleId};

pub use memory::InMemoryArticleStore;
pub use mongo::MongoArticleStore;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid article id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Article {0} no longer exists")]
    Missing(ArticleId),

    /// Backend unreachable without a driver error to report. Raised by stores
    /// that are not driver-backed, such as the failing doubles in tests.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for articles.
pub trait ArticleStore: Send + Sync {
    /// Persist a new article and return it with its assigned id.
    fn insert(&self, fields: ArticleFields, image: Option<String>) -> StoreFuture<'_, Article>;

    /// All articles in the store's natural order.
    fn list(&self) -> StoreFuture<'_, Vec<Article>>;

    /// Look up a single article by its raw id.
    fn find(&self, id: &str) -> StoreFuture<'_, Option<Article>>;

    /// Replace a previously loaded article. Fails with [`StoreError::Missing`]
    /// when the article has been deleted in the meantime.
    fn save(&self, article: Article) -> StoreFuture<'_, ()>;

    /// Remove an article by its raw id.
    fn delete(&self, id: &str) -> StoreFuture<'_, ()>;
}

pub(crate) fn parse_id(raw: &str) -> Result<ArticleId, StoreError> {
    raw.parse()
}
