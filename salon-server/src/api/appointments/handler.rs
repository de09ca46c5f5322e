//! Appointment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Appointment, AppointmentCreate, AppointmentUpdate, TimeSlot};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::appointment;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_interval, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "appointment";

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub staff_id: i64,
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct ConflictQuery {
    pub staff_id: i64,
    pub start: i64,
    pub end: i64,
    pub exclude_id: Option<i64>,
}

/// GET /api/appointments - all bookings ordered by start
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = appointment::find_all(&state.pool).await?;
    Ok(Json(appointments))
}

/// GET /api/appointments/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    let found = appointment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::AppointmentNotFound, format!("Appointment {id} not found"))
        })?;
    Ok(Json(found))
}

/// GET /api/appointments/availability?staff_id&date - free slots
pub async fn availability(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let slots = state
        .scheduler()
        .available_slots(query.staff_id, &query.date)
        .await?;
    Ok(Json(slots))
}

/// GET /api/appointments/conflict?staff_id&start&end&exclude_id
pub async fn conflict(
    State(state): State<ServerState>,
    Query(query): Query<ConflictQuery>,
) -> AppResult<Json<bool>> {
    let hit = state
        .scheduler()
        .has_conflict(query.staff_id, query.start, query.end, query.exclude_id)
        .await?;
    Ok(Json(hit))
}

/// POST /api/appointments - book, gated on conflicts, with a pending sale
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<Json<Appointment>> {
    validate_required_text(&payload.service_type, "service_type", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_interval(payload.start_time, payload.end_time)?;

    let created = state.scheduler().book(payload).await?;
    audit_log!("create", RESOURCE, created.id);
    Ok(Json(created))
}

/// PUT /api/appointments/{id} - gated on conflicts when the slot changes
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentUpdate>,
) -> AppResult<Json<Appointment>> {
    if let Some(service_type) = &payload.service_type {
        validate_required_text(service_type, "service_type", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    if let (Some(start), Some(end)) = (payload.start_time, payload.end_time) {
        validate_interval(start, end)?;
    }

    let updated = state.scheduler().reschedule(id, payload).await?;
    audit_log!("update", RESOURCE, id, format!("status={:?}", updated.status));
    Ok(Json(updated))
}

/// DELETE /api/appointments/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = appointment::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}
