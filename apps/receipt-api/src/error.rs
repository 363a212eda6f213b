//! Error types for the receipt API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use receipt_providers::ProviderError;

/// Request-level errors. Upload validation problems are the caller's fault
/// and are rejected before any external call; OCR failures abort the
/// request as an upstream error. Extraction failures never appear here,
/// they are absorbed into the response body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no file field in multipart upload")]
    MissingFile,

    #[error("unsupported content type '{0}': an image upload is required")]
    NotAnImage(String),

    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("malformed multipart request: {0}")]
    Multipart(String),

    #[error("OCR failed: {0}")]
    Ocr(#[from] ProviderError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::NotAnImage(_) => (StatusCode::BAD_REQUEST, "NOT_AN_IMAGE"),
            ApiError::EmptyUpload => (StatusCode::BAD_REQUEST, "EMPTY_UPLOAD"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "BAD_MULTIPART"),
            ApiError::Ocr(_) => (StatusCode::BAD_GATEWAY, "OCR_FAILED"),
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
