use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{parse_id, ApiError};
use super::state::AppState;
use crate::storage::{Article, ArticleFilter, BlogStats};

/// Raw query string of `GET /api/articles`
#[derive(Debug, Default, Deserialize)]
pub struct ArticleParams {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ArticleParams {
    pub fn to_filter(&self) -> ArticleFilter {
        ArticleFilter::new(self.category.as_deref(), self.search.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: i64,
}

pub async fn test_handler() -> Json<Value> {
    Json(json!({ "message": "Backend fonctionne !" }))
}

pub async fn list_articles_handler(
    State(state): State<AppState>,
    Query(params): Query<ArticleParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.db.list_articles(&params.to_filter()).await?;
    Ok(Json(articles))
}

pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    state
        .db
        .get_article(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn like_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let id = parse_id(&id)?;
    let likes = state.db.like_article(id).await?.ok_or(ApiError::NotFound)?;
    tracing::debug!(article_id = id, likes, "Article liked");
    Ok(Json(LikeResponse { likes }))
}

pub async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.db.list_categories().await?))
}

pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<BlogStats>, ApiError> {
    Ok(Json(state.db.stats().await?))
}
