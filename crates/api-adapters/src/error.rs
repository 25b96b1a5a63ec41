//! # ApiError
//!
//! The one error-to-status table for every route on both surfaces:
//!
//! | Cause | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `InvalidIdentifier`, `Validation`, malformed body | 400 |
//! | body over the size limit | 413 |
//! | unsupported body content type | 415 |
//! | store failure, template failure | 500 |
//!
//! Bodies are always `{"error": "<reason>", "message": "<detail>"}`. Server
//! side causes are logged and replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::AppError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] AppError),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("unsupported content type `{0}`; send application/json or application/x-www-form-urlencoded")]
    UnsupportedMediaType(String),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(AppError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(AppError::InvalidIdentifier(_))
            | ApiError::Domain(AppError::Validation(_))
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Domain(AppError::Store(_)) | ApiError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            reason.to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: reason, message })).into_response()
    }
}
