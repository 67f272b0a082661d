//! Request handlers.
//!
//! Handlers run only after the admission layer (origin check, rate
//! limit) has passed. Store failures surface as a generic 500 via
//! [`AppError`]; the detail stays in the server log.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::db::NewSubmission;
use crate::error::AppError;
use crate::http::server::AppState;

/// `GET /otherservice` — all rows of the external service listing.
pub async fn list_other_service(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.store.list_other_service().await?))
}

/// `GET /services_content` — all rows of the services content listing.
pub async fn list_services_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.store.list_services_content().await?))
}

/// `POST /form_request` — persist a contact form submission.
///
/// Responds 201 with the stored row, then dispatches the acknowledgment
/// email without awaiting it. A mail failure never affects the response.
pub async fn submit_form(
    State(state): State<AppState>,
    Json(submission): Json<NewSubmission>,
) -> Result<impl IntoResponse, AppError> {
    submission.validate()?;

    let record = state.store.insert_submission(&submission).await?;
    tracing::info!(id = record.id, "Form submission stored");

    if let Some(mailer) = &state.mailer {
        mailer.dispatch_acknowledgment(&record.name, &record.email);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Request submitted successfully",
            "data": record,
        })),
    ))
}

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
