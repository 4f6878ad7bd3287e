use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use std::error::Error as StdError;

use crate::convert::ConvertError;
use crate::kv::KvError;
use crate::llm_client::LlmError;
use crate::storage::StorageError;

/// Why a résumé analysis stopped. One variant per step that can fail.
///
/// Every failure is terminal for the submission: nothing already uploaded or
/// persisted is rolled back.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("resume upload failed")]
    Upload(#[source] StorageError),

    #[error("PDF conversion failed")]
    Conversion(#[source] ConvertError),

    #[error("PDF conversion produced no image")]
    NoImage,

    #[error("image upload failed")]
    ImageUpload(#[source] StorageError),

    #[error("persisting resume record failed")]
    Persist(#[from] KvError),

    #[error("AI feedback failed")]
    Feedback(#[source] LlmError),

    #[error("AI feedback could not be parsed")]
    InvalidFeedback(#[source] LlmError),
}

impl AnalyzeError {
    /// Short status string shown to the user.
    pub fn status_text(&self) -> &'static str {
        match self {
            AnalyzeError::Upload(_) => "Error uploading file",
            AnalyzeError::Conversion(_) | AnalyzeError::NoImage => "Error converting to image",
            AnalyzeError::ImageUpload(_) => "Error uploading image",
            AnalyzeError::Persist(_) => "Error saving resume data",
            AnalyzeError::Feedback(_) => "Error: Failed to analyze resume",
            AnalyzeError::InvalidFeedback(_) => "Error: Failed to parse feedback",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AnalyzeError::Upload(_) => "UPLOAD_FAILED",
            AnalyzeError::Conversion(_) | AnalyzeError::NoImage => "CONVERSION_FAILED",
            AnalyzeError::ImageUpload(_) => "IMAGE_UPLOAD_FAILED",
            AnalyzeError::Persist(_) => "PERSIST_FAILED",
            AnalyzeError::Feedback(_) => "FEEDBACK_FAILED",
            AnalyzeError::InvalidFeedback(_) => "INVALID_FEEDBACK",
        }
    }
}

/// Renders an error followed by each of its sources, joined by `: `.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis failed")]
    Analysis(#[from] AnalyzeError),

    #[error("Key-value store error")]
    Kv(#[from] KvError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Analysis(e) => (
                StatusCode::BAD_GATEWAY,
                e.code(),
                e.status_text().to_string(),
            ),
            AppError::Kv(e) => {
                tracing::error!("{}", error_chain(&self));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "KV_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_per_step() {
        let upload = AnalyzeError::Upload(StorageError::Upload {
            path: "x".to_string(),
            message: "boom".to_string(),
        });
        assert_eq!(upload.status_text(), "Error uploading file");
        assert_eq!(AnalyzeError::NoImage.status_text(), "Error converting to image");
        assert_eq!(
            AnalyzeError::Feedback(LlmError::EmptyContent).status_text(),
            "Error: Failed to analyze resume"
        );
    }

    #[test]
    fn test_error_chain_prints_each_cause_once() {
        let err = AnalyzeError::Upload(StorageError::Upload {
            path: "x".to_string(),
            message: "boom".to_string(),
        });
        assert_eq!(err.to_string(), "resume upload failed");
        assert_eq!(
            error_chain(&err),
            "resume upload failed: upload of 'x' failed: boom"
        );

        let nested = AppError::from(AnalyzeError::Feedback(LlmError::Document(
            StorageError::Download {
                path: "y".to_string(),
                message: "gone".to_string(),
            },
        )));
        let chain = error_chain(&nested);
        assert_eq!(
            chain,
            "Analysis failed: AI feedback failed: could not read document: download of 'y' failed: gone"
        );
        assert_eq!(chain.matches("gone").count(), 1);
    }

    #[test]
    fn test_analysis_error_maps_to_bad_gateway() {
        let response = AppError::from(AnalyzeError::NoImage).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("no file".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
