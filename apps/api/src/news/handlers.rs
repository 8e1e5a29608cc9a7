use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::news::NewsArticle;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<NewsArticle>,
}

/// GET /api/news
pub async fn handle_get_news(State(state): State<AppState>) -> Result<Json<NewsResponse>, AppError> {
    let articles = state.news.fetch_tech_news().await?;
    Ok(Json(NewsResponse { articles }))
}
