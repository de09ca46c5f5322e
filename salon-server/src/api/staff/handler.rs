//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Appointment, Staff, StaffCreate, StaffPerformance, StaffUpdate};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::{appointment, staff};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "staff";

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub start_date: String,
    pub end_date: String,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::StaffNotFound, format!("Staff {id} not found"))
}

/// GET /api/staff - ordered by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Staff>>> {
    let members = staff::find_all(&state.pool).await?;
    Ok(Json(members))
}

/// GET /api/staff/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<Staff>> {
    let found = staff::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/staff
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<Staff>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.role, "role", MAX_SHORT_TEXT_LEN)?;

    let created = staff::create(&state.pool, payload).await?;
    audit_log!("create", RESOURCE, created.id);
    Ok(Json(created))
}

/// PUT /api/staff/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<Staff>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.role, "role", MAX_SHORT_TEXT_LEN)?;

    let updated = staff::update(&state.pool, id, payload).await?;
    audit_log!("update", RESOURCE, id);
    Ok(Json(updated))
}

/// DELETE /api/staff/{id} - refused while the member has appointments
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let booked = appointment::count_for_staff(&state.pool, id).await?;
    if booked > 0 {
        return Err(AppError::with_message(
            ErrorCode::StaffHasAppointments,
            format!("Staff {id} still has {booked} appointment(s)"),
        )
        .with_detail("appointments", booked));
    }

    let deleted = staff::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}

/// GET /api/staff/{id}/schedule?date - bookings starting that day
pub async fn schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let day = state.scheduler().day_schedule(id, &query.date).await?;
    Ok(Json(day))
}

/// GET /api/staff/{id}/performance?start_date&end_date
pub async fn performance(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PerformanceQuery>,
) -> AppResult<Json<StaffPerformance>> {
    let performance = state
        .reporter()
        .staff_performance(id, &query.start_date, &query.end_date)
        .await?;
    Ok(Json(performance))
}
