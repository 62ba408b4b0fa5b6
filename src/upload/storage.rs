//! On-disk image storage.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{self, File, OpenOptions};

use crate::config::UploadConfig;

/// Attempts at finding a free name before giving up on a busy millisecond.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Handle to the uploads directory, cheap to clone into request state.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    inner: Arc<StorageInner>,
}

#[derive(Debug)]
struct StorageInner {
    dir: PathBuf,
    /// Prefix recorded in `Article::image`, e.g. `uploads`.
    public_prefix: String,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            inner: Arc::new(StorageInner {
                dir: dir.into(),
                public_prefix: url_prefix.trim_matches('/').to_string(),
            }),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.dir, &config.url_prefix)
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Create the uploads directory if it does not exist yet.
    pub async fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.inner.dir).await
    }

    /// Open a new, uniquely named file for `original_name`.
    pub async fn create(&self, original_name: &str) -> io::Result<(File, StoredImage)> {
        let base = sanitize_file_name(original_name);
        let now = chrono::Utc::now().timestamp_millis();

        let mut attempt = 0;
        loop {
            let file_name = stored_file_name(now + attempt, &base);
            let path = self.inner.dir.join(&file_name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    tracing::debug!(path = %path.display(), "Upload file created");
                    let public_path = format!("{}/{}", self.inner.public_prefix, file_name);
                    return Ok((file, StoredImage { path, public_path }));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// An image written to disk for the current request.
///
/// Not yet referenced by any stored article until the handler saves it.
#[derive(Debug)]
pub struct StoredImage {
    path: PathBuf,
    public_path: String,
}

impl StoredImage {
    pub fn disk_path(&self) -> &Path {
        &self.path
    }

    /// Value recorded in the article's `image` field.
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Remove the file. Used when the record that would reference it is not saved.
    pub async fn discard(self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "Removed orphaned upload"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove orphaned upload"
            ),
        }
    }
}

/// `<millis>-<name>`.
pub fn stored_file_name(millis: i64, name: &str) -> String {
    format!("{}-{}", millis, name)
}

/// Keep only the final path component of a client-supplied filename.
pub fn sanitize_file_name(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    match name {
        "" | "." | ".." => "upload".to_string(),
        other => other.to_string(),
    }
}
