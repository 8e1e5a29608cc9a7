use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    pub stars: i32,
    pub date: DateTime<Utc>,
}
