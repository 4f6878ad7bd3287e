use axum::{
    extract::{Multipart, Path, State},
    response::Redirect,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{record_key, ResumeRecord};
use crate::state::AppState;
use crate::upload::form::UploadForm;
use crate::upload::status::TracingStatus;

/// POST /api/v1/upload
///
/// Runs the full analysis for one multipart submission and redirects to the
/// results view. Nothing is uploaded when the form carries no file.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let request = UploadForm::from_multipart(multipart).await?.into_request()?;

    let outcome = state.analyzer.analyze(request, &TracingStatus).await?;
    info!("Resume {} analysed, redirecting", outcome.record.id);

    Ok(Redirect::to(&outcome.redirect_to))
}

/// GET /resume/:id
///
/// Returns the stored record, with or without feedback.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeRecord>, AppError> {
    let raw = state
        .kv
        .get(&record_key(&id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let record: ResumeRecord =
        serde_json::from_str(&raw).map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(record))
}
