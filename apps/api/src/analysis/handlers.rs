//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::analysis::models::{AnalysisRecord, ProfileForm};
use crate::analysis::upload::UploadedDocument;
use crate::analysis::ProfileInput;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field that carries the resume PDF.
pub const RESUME_FIELD: &str = "resume";

/// POST /api/ai/upload-resume
///
/// Stores the uploaded PDF in the upload directory, runs the resume analysis,
/// and returns the `AnalysisRecord`. The stored file never outlives the request.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisRecord>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(&state, "Malformed upload", e))?
    {
        if field.name() == Some(RESUME_FIELD) {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| upload_error(&state, "Failed to read uploaded file", e))?;
            upload = Some((file_name, data));
            break;
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    info!(size = data.len(), file_name = ?file_name, "Resume upload received");

    let document = UploadedDocument::persist(&state.config.upload_dir, data, file_name)
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::Error::new(e).context("Failed to store uploaded resume"))
        })?;

    let record = state.pipeline.run(ProfileInput::Document(document)).await?;
    Ok(Json(record))
}

/// Body-limit overruns map to 413; any other multipart failure is a 400.
fn upload_error(state: &AppState, context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Uploaded file exceeds the {} byte limit",
            state.config.max_upload_bytes
        ))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

/// POST /api/ai/analyze-profile
///
/// Runs the manual analysis on the three free-text profile fields.
pub async fn handle_analyze_profile(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = state.pipeline.run(ProfileInput::Form(form)).await?;
    Ok(Json(record))
}
