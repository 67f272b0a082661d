//! Application error taxonomy.
//!
//! Store failures are logged with full detail server-side and surfaced to
//! callers as a generic message. Admission rejections (CORS, rate limit)
//! are produced by the middleware layer and never pass through here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Store query or connection failure.
    #[error("store error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store call exceeded the configured query timeout.
    #[error("store query timed out")]
    StoreTimeout,

    /// A required submission field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::StoreTimeout => {
                tracing::error!("Store query timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Missing required field: {}", field),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
