//! Image upload subsystem.
//!
//! # Data Flow
//! ```text
//! multipart request
//!     → extract.rs (ArticleSubmission extractor, runs before the handler body)
//!         → text parts → ArticleFields
//!         → `image` part → storage.rs (stream to <dir>/<millis>-<name>)
//!     → handler saves the record, or discards the file on failure
//! ```
//!
//! # Design Decisions
//! - Filenames are reduced to their last path component
//! - Names never overwrite an existing file (create_new, bump the timestamp)
//! - A failed save removes the file it would have referenced

pub mod extract;
pub mod storage;

pub use extract::{ArticleSubmission, UploadError, IMAGE_FIELD};
pub use storage::{ImageStorage, StoredImage};
