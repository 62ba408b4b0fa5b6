use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};

use crate::article::Article;
use crate::error::ApiError;
use crate::http::server::AppState;
use crate::store::StoreError;
use crate::upload::ArticleSubmission;

pub const CREATED_MESSAGE: &str = "Article Added Successfully";
pub const UPDATED_MESSAGE: &str = "Article updated successfully";
pub const DELETED_MESSAGE: &str = "Article Deleted Successfully";

/// Article CRUD routes, relative to the API prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_article))
        .route("/view", get(list_articles))
        .route("/view/{id}", get(get_article))
        .route("/update/{id}", patch(update_article))
        .route("/delete/{id}", delete(delete_article))
}

pub async fn create_article(
    State(state): State<AppState>,
    mut submission: ArticleSubmission,
) -> Result<(StatusCode, &'static str), ApiError> {
    let image = submission.image.as_ref().map(|i| i.public_path().to_string());
    let fields = std::mem::take(&mut submission.fields);

    match state.articles.insert(fields, image).await {
        Ok(article) => {
            tracing::info!(id = %article.id, image = ?article.image, "Article created");
            Ok((StatusCode::CREATED, CREATED_MESSAGE))
        }
        Err(e) => {
            submission.discard_image().await;
            Err(e.into())
        }
    }
}

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.articles.list().await?;
    Ok(Json(articles))
}

/// Responds with `null` when no article matches a well-formed id.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Article>>, ApiError> {
    let article = state.articles.find(&id).await?;
    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut submission: ArticleSubmission,
) -> Result<(StatusCode, &'static str), ApiError> {
    if let Err(e) = apply_update(&state, &id, &mut submission).await {
        submission.discard_image().await;
        return Err(e);
    }

    tracing::info!(id = %id, "Article updated");
    Ok((StatusCode::OK, UPDATED_MESSAGE))
}

async fn apply_update(
    state: &AppState,
    id: &str,
    submission: &mut ArticleSubmission,
) -> Result<(), ApiError> {
    let mut article = state.articles.find(id).await?.ok_or(ApiError::NotFound)?;

    let image = submission.image.as_ref().map(|i| i.public_path().to_string());
    article.apply_update(std::mem::take(&mut submission.fields), image);

    // A delete may land between the lookup and the write.
    match state.articles.save(article).await {
        Err(StoreError::Missing(_)) => Err(ApiError::NotFound),
        result => Ok(result?),
    }
}

/// Succeeds whether or not the article existed.
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    state.articles.delete(&id).await?;
    tracing::info!(id = %id, "Article deleted");
    Ok((StatusCode::OK, DELETED_MESSAGE))
}
