//! Review board: students leave a short review with a star rating.

pub mod handlers;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::review::ReviewRow;

pub const DEFAULT_STARS: i32 = 5;
const MAX_STARS: i32 = 5;

/// Request body for POST /api/reviews.
#[derive(Debug, Default, Deserialize)]
pub struct NewReviewRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub stars: Option<i32>,
}

/// A review that passed validation and can be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub name: String,
    pub text: String,
    pub stars: i32,
}

impl NewReviewRequest {
    pub fn validate(self) -> Result<NewReview, String> {
        let name = self.name.trim();
        let text = self.text.trim();
        if name.is_empty() {
            return Err("name is required".to_string());
        }
        if text.is_empty() {
            return Err("text is required".to_string());
        }

        let stars = self.stars.unwrap_or(DEFAULT_STARS);
        if !(1..=MAX_STARS).contains(&stars) {
            return Err(format!("stars must be between 1 and {MAX_STARS}"));
        }

        Ok(NewReview {
            name: name.to_string(),
            text: text.to_string(),
            stars,
        })
    }
}

/// All reviews, newest first.
pub async fn list_reviews(pool: &PgPool) -> Result<Vec<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews ORDER BY date DESC")
        .fetch_all(pool)
        .await
}

pub async fn insert_review(pool: &PgPool, review: &NewReview) -> Result<ReviewRow, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (id, name, text, stars)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&review.name)
    .bind(&review.text)
    .bind(review.stars)
    .fetch_one(pool)
    .await
}
