use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::review::ReviewRow;
use crate::reviews::{insert_review, list_reviews, NewReviewRequest};
use crate::state::AppState;

/// GET /api/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewRow>>, AppError> {
    let reviews = list_reviews(&state.db).await?;
    Ok(Json(reviews))
}

/// POST /api/reviews
pub async fn handle_create_review(
    State(state): State<AppState>,
    Json(req): Json<NewReviewRequest>,
) -> Result<(StatusCode, Json<ReviewRow>), AppError> {
    let review = req.validate().map_err(AppError::Validation)?;
    let row = insert_review(&state.db, &review).await?;
    tracing::info!(review_id = %row.id, stars = row.stars, "Review stored");
    Ok((StatusCode::CREATED, Json(row)))
}
