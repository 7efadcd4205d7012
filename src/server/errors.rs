use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised by the development API. Rendered as `{ "detail": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Lookups ──────────────────────────────────────────────────────────────
    #[error("Paper not found")]
    PaperNotFound { id: String },

    #[error("Group {id} not found")]
    GroupNotFound { id: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' must be at least {min_length} characters (actual: {actual_length})")]
    FieldTooShort {
        field_name: String,
        min_length: usize,
        actual_length: usize,
    },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong {
        field_name: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Field '{field_name}' must be between {min} and {max} (actual: {actual})")]
    OutOfRange {
        field_name: String,
        min: u32,
        max: u32,
        actual: u32,
    },

    #[error("At least {min} paper IDs are required for comparison")]
    TooFewPapers { min: usize, actual: usize },

    // ── Uploads ──────────────────────────────────────────────────────────────
    #[error("Only PDF files are accepted")]
    NotPdf,

    #[error("{0}")]
    InvalidUpload(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::PaperNotFound { .. } | AppError::GroupNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::EmptyField { .. }
                | AppError::FieldTooShort { .. }
                | AppError::FieldTooLong { .. }
                | AppError::OutOfRange { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
