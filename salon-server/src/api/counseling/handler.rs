//! Counseling Sheet API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{CounselingSheet, CounselingSheetCreate, CounselingSheetUpdate, CounselingStatus};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::counseling_sheet;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "counseling_sheet";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub status: Option<CounselingStatus>,
}

fn validate_texts(
    concerns: &Option<String>,
    allergies: &Option<String>,
    preferences: &Option<String>,
    notes: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(concerns, "concerns", MAX_NOTE_LEN)?;
    validate_optional_text(allergies, "allergies", MAX_NOTE_LEN)?;
    validate_optional_text(preferences, "preferences", MAX_NOTE_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)
}

/// GET /api/counseling - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CounselingSheet>>> {
    let sheets = counseling_sheet::find_all(&state.pool).await?;
    Ok(Json(sheets))
}

/// GET /api/counseling/search?q&status
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<CounselingSheet>>> {
    let sheets = counseling_sheet::search(&state.pool, query.q.as_deref(), query.status).await?;
    Ok(Json(sheets))
}

/// GET /api/counseling/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CounselingSheet>> {
    let found = counseling_sheet::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CounselingSheetNotFound,
                format!("Counseling sheet {id} not found"),
            )
        })?;
    Ok(Json(found))
}

/// POST /api/counseling
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CounselingSheetCreate>,
) -> AppResult<Json<CounselingSheet>> {
    validate_texts(&payload.concerns, &payload.allergies, &payload.preferences, &payload.notes)?;

    let created = counseling_sheet::create(&state.pool, payload).await?;
    audit_log!("create", RESOURCE, created.id);
    Ok(Json(created))
}

/// PUT /api/counseling/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CounselingSheetUpdate>,
) -> AppResult<Json<CounselingSheet>> {
    validate_texts(&payload.concerns, &payload.allergies, &payload.preferences, &payload.notes)?;

    let updated = counseling_sheet::update(&state.pool, id, payload).await?;
    audit_log!("update", RESOURCE, id, format!("status={:?}", updated.status));
    Ok(Json(updated))
}

/// DELETE /api/counseling/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = counseling_sheet::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}
