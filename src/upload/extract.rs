//! Request body extraction for article submissions.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRef, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use tokio::io::AsyncWriteExt;

use crate::article::ArticleFields;
use crate::error::ApiError;
use crate::upload::storage::{ImageStorage, StoredImage};

/// The only multipart field accepted as a file.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to write upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),
}

/// Article fields plus the image written to disk, if one was attached.
///
/// Multipart bodies are streamed to the uploads directory during extraction, so
/// the file already exists when the handler runs. JSON and urlencoded bodies
/// carry fields only; any other body is treated as empty.
#[derive(Debug, Default)]
pub struct ArticleSubmission {
    pub fields: ArticleFields,
    pub image: Option<StoredImage>,
}

impl ArticleSubmission {
    /// Drop the stored image, if any.
    pub async fn discard_image(&mut self) {
        if let Some(image) = self.image.take() {
            image.discard().await;
        }
    }
}

impl<S> FromRequest<S> for ArticleSubmission
where
    S: Send + Sync,
    ImageStorage: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::invalid_request(rejection.status(), rejection.body_text()))?;
            let storage = ImageStorage::from_ref(state);
            Ok(read_multipart(multipart, &storage).await?)
        } else if content_type.starts_with("application/json") {
            let Json(fields) = Json::<ArticleFields>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::invalid_request(rejection.status(), rejection.body_text()))?;
            Ok(Self { fields, image: None })
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<ArticleFields>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::invalid_request(rejection.status(), rejection.body_text()))?;
            Ok(Self { fields, image: None })
        } else {
            Ok(Self::default())
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    storage: &ImageStorage,
) -> Result<ArticleSubmission, UploadError> {
    let mut submission = ArticleSubmission::default();
    match read_parts(&mut multipart, storage, &mut submission).await {
        Ok(()) => Ok(submission),
        Err(e) => {
            submission.discard_image().await;
            Err(e)
        }
    }
}

async fn read_parts(
    multipart: &mut Multipart,
    storage: &ImageStorage,
    submission: &mut ArticleSubmission,
) -> Result<(), UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            // Browsers send an empty filename for an untouched file input.
            Some(file_name) if file_name.is_empty() => continue,
            Some(file_name) => {
                if name != IMAGE_FIELD || submission.image.is_some() {
                    return Err(UploadError::UnexpectedField(name));
                }
                submission.image = Some(write_field(storage, &file_name, &mut field).await?);
            }
            None => {
                let value = field.text().await?;
                if !submission.fields.set(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }
    }
    Ok(())
}

async fn write_field(
    storage: &ImageStorage,
    file_name: &str,
    field: &mut Field<'_>,
) -> Result<StoredImage, UploadError> {
    let (mut file, image) = storage.create(file_name).await?;

    let written = async {
        let mut bytes = 0usize;
        while let Some(chunk) = field.chunk().await? {
            bytes += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok::<_, UploadError>(bytes)
    }
    .await;

    match written {
        Ok(bytes) => {
            tracing::info!(path = %image.public_path(), bytes, "Stored upload");
            Ok(image)
        }
        Err(e) => {
            drop(file);
            image.discard().await;
            Err(e)
        }
    }
}
