//! Error envelope returned by every failing endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::news::NewsError;
use crate::store::StoreError;
use crate::upload::UploadError;

/// Generic text for failures whose cause is only logged server-side.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";
pub const NOT_FOUND_MESSAGE: &str = "Article not found";
pub const NEWS_ERROR_MESSAGE: &str = "Failed to fetch news";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Not Found";
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Article not found")]
    NotFound,

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Request exceeded the configured timeout")]
    Timeout,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    News(#[from] NewsError),

    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn invalid_request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            status,
            message: message.into(),
        }
    }

    /// Machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound | ApiError::RouteNotFound(_) => "not_found",
            ApiError::Timeout => "timeout",
            ApiError::Store(_) => "store",
            ApiError::Upload(UploadError::Io(_)) => "upload",
            ApiError::Upload(_) | ApiError::InvalidRequest { .. } => "invalid_request",
            ApiError::News(_) => "upstream",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Store(_) | ApiError::News(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(UploadError::Multipart(e)) => e.status(),
            ApiError::Upload(UploadError::UnexpectedField(_)) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest { status, .. } => *status,
        }
    }

    /// Text shown to the client. Server-side causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ApiError::RouteNotFound(_) => ROUTE_NOT_FOUND_MESSAGE.to_string(),
            ApiError::Timeout => TIMEOUT_MESSAGE.to_string(),
            ApiError::Store(_) | ApiError::Upload(UploadError::Io(_)) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
            ApiError::News(_) => NEWS_ERROR_MESSAGE.to_string(),
            ApiError::Upload(e) => e.to_string(),
            ApiError::InvalidRequest { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            kind: self.kind(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
