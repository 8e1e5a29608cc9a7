use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::users::{
    authenticate, find_user_by_email, hash_password, insert_user, LoginRequest, RegisterRequest,
};

/// POST /api/users/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = req.validate().map_err(AppError::Validation)?;
    let password_hash = hash_password(user.password.clone()).await?;
    let row = insert_user(&state.db, &user, &password_hash).await?;
    tracing::info!(user_id = %row.id, "User registered");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// POST /api/users/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let credentials = req.validate().map_err(AppError::Validation)?;
    let stored = find_user_by_email(&state.db, &credentials.email).await?;
    let row = authenticate(stored, credentials.password).await?;
    tracing::info!(user_id = %row.id, "User logged in");
    Ok(Json(row.into()))
}
