//! Appointment endpoints.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use bookd_core::{Appointment, DayRange};
use serde::Deserialize;

use crate::routes::ApiError;
use crate::state::AppState;
use crate::validate::{self, AppointmentBody};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(create).get(find_all_by_day))
        .route("/appointments/byDay", get(find_all_by_day))
        .route("/appointments/{id}", patch(update).delete(remove))
}

/// Query parameters for the by-day listing
#[derive(Deserialize)]
struct DayQuery {
    day: Option<String>,
}

/// POST /appointments - Book a new appointment
async fn create(
    State(state): State<AppState>,
    body: Result<Json<AppointmentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(body) = body.map_err(reject_body)?;
    let request = validate::parse_create(body).map_err(ApiError::Validation)?;
    let created = state.scheduler().create(request).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /appointments?day=YYYY-MM-DD (also mounted at /appointments/byDay) -
/// List all appointments starting that day
async fn find_all_by_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let day = query
        .day
        .as_deref()
        .and_then(DayRange::parse)
        .ok_or_else(|| {
            ApiError::Validation(vec!["day must be a valid ISO 8601 date string".to_string()])
        })?;

    let appointments = state.scheduler().find_all_by_day(day).await?;
    Ok(Json(appointments))
}

/// PATCH /appointments/{id} - Partially update an appointment
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<AppointmentBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(body) = body.map_err(reject_body)?;
    let patch = validate::parse_patch(body).map_err(ApiError::Validation)?;
    let updated = state.scheduler().update(id, patch).await?;

    Ok(Json(updated))
}

/// Unreadable bodies (bad syntax, wrong content type) are shape failures,
/// not business ones
fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(vec![rejection.body_text()])
}

/// DELETE /appointments/{id} - Remove an appointment permanently
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, ApiError> {
    let removed = state.scheduler().remove(id).await?;
    Ok(Json(removed))
}
