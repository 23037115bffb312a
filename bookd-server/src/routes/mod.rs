//! HTTP routes and the error-taxonomy-to-status mapping.

pub mod appointments;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookd_core::SchedulingError;
use serde_json::json;

/// Errors surfaced by the API.
///
/// Field-shape violations aggregate into a 400 with one message per rule;
/// business rule failures carry a single message and map to 422. Storage
/// failures are the only 500s.
pub enum ApiError {
    Validation(Vec<String>),
    Business(SchedulingError),
}

impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        ApiError::Business(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(messages) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "statusCode": 400,
                    "message": messages,
                    "error": "Bad Request",
                })),
            )
                .into_response(),
            ApiError::Business(SchedulingError::Store(reason)) => {
                tracing::error!("storage failure: {reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "statusCode": 500,
                        "message": "Internal server error",
                    })),
                )
                    .into_response()
            }
            ApiError::Business(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "statusCode": 422,
                    "message": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}
