//! Student accounts: registration and email/password login.
//!
//! Passwords are stored as Argon2id PHC strings. Hashing and verification are
//! CPU-bound and run on the blocking pool.

pub mod handlers;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

pub const MIN_PASSWORD_CHARS: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Request body for POST /api/users/register.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for POST /api/users/login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A registration that passed validation. Email is trimmed and lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required".to_string());
        }
        let email = normalize_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ));
        }

        Ok(NewUser {
            name: name.to_string(),
            email,
            password: self.password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, String> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || self.password.is_empty() {
            return Err("email and password are required".to_string());
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err("email is required".to_string());
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(format!("'{}' is not a valid email address", raw.trim())),
    }
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("salt encoding failed: {e}")))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

/// Produces an Argon2id PHC string for `password`.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing task failed: {e}")))?
}

/// Accepts the stored account only if it exists and `password` matches its hash.
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(user: Option<UserRow>, password: String) -> Result<UserRow, AppError> {
    let Some(user) = user else {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let stored_hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password check task failed: {e}")))?;

    if matches {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

pub async fn insert_user(
    pool: &PgPool,
    user: &NewUser,
    password_hash: &str,
) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("A user with this email already exists".to_string())
        }
        other => AppError::Database(other),
    })
}

pub async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}
