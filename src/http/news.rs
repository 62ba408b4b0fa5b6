use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/top-news", get(top_news))
}

/// Relay the upstream headlines JSON as-is.
pub async fn top_news(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let headlines = state.news.top_headlines().await?;
    Ok(Json(headlines))
}
