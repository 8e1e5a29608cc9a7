pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::news::handlers as news;
use crate::reviews::handlers as reviews;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/ai/upload-resume", post(analysis::handle_upload_resume))
        .route("/api/ai/analyze-profile", post(analysis::handle_analyze_profile))
        // Accounts
        .route("/api/users/register", post(users::handle_register))
        .route("/api/users/login", post(users::handle_login))
        // Review board
        .route(
            "/api/reviews",
            get(reviews::handle_list_reviews).post(reviews::handle_create_review),
        )
        // News proxy
        .route("/api/news", get(news::handle_get_news))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
