//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use loan_eligibility_core::{ModelError, ReportError};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("validation error: {0}")]
    ValidationError(String),

    // Feature vector and model disagree
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::SchemaMismatch(msg) => {
                tracing::error!("Schema mismatch: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model schema mismatch")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Applicant(e) => AppError::ValidationError(e.to_string()),
            ReportError::Model(ModelError::SchemaMismatch(msg)) => AppError::SchemaMismatch(msg),
            ReportError::Model(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
