//! Application error types and Axum response conversion.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fare_model::PredictError;
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
///
/// Every per-request failure is the caller's to fix, so all of them map to 400.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
}

impl From<PredictError> for AppError {
    fn from(e: PredictError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::BadRequest(message) = self;
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
    }
}
