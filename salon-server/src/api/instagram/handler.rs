//! Instagram Post API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{InstagramPost, InstagramPostCreate, InstagramPostUpdate, PostStatus};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::instagram_post;
use crate::utils::validation::{MAX_CAPTION_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "instagram_post";

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::PostNotFound, format!("Instagram post {id} not found"))
}

/// A SCHEDULED post must say when
fn ensure_schedule(status: PostStatus, scheduled_time: Option<i64>) -> AppResult<()> {
    if status == PostStatus::Scheduled && scheduled_time.is_none() {
        return Err(AppError::with_message(
            ErrorCode::PostScheduleMissing,
            "scheduled_time is required for SCHEDULED posts",
        ));
    }
    Ok(())
}

/// GET /api/instagram - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InstagramPost>>> {
    let posts = instagram_post::find_all(&state.pool).await?;
    Ok(Json(posts))
}

/// GET /api/instagram/scheduled - upcoming SCHEDULED posts, soonest first
pub async fn scheduled(State(state): State<ServerState>) -> AppResult<Json<Vec<InstagramPost>>> {
    let posts = instagram_post::find_scheduled(&state.pool, shared::util::now_millis()).await?;
    Ok(Json(posts))
}

/// GET /api/instagram/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InstagramPost>> {
    let found = instagram_post::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/instagram
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InstagramPostCreate>,
) -> AppResult<Json<InstagramPost>> {
    validate_required_text(&payload.caption, "caption", MAX_CAPTION_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    ensure_schedule(payload.status, payload.scheduled_time)?;

    let created = instagram_post::create(&state.pool, payload).await?;
    if let Some(at) = created.scheduled_time {
        tracing::info!(post_id = created.id, scheduled_time = at, "Instagram post scheduled");
    }
    audit_log!("create", RESOURCE, created.id);
    Ok(Json(created))
}

/// PUT /api/instagram/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InstagramPostUpdate>,
) -> AppResult<Json<InstagramPost>> {
    if let Some(caption) = &payload.caption {
        validate_required_text(caption, "caption", MAX_CAPTION_LEN)?;
    }
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;

    let current = instagram_post::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_schedule(
        payload.status.unwrap_or(current.status),
        payload.scheduled_time.or(current.scheduled_time),
    )?;

    let updated = instagram_post::update(&state.pool, id, payload).await?;
    if updated.scheduled_time != current.scheduled_time {
        tracing::info!(
            post_id = id,
            from = ?current.scheduled_time,
            to = ?updated.scheduled_time,
            "Instagram post rescheduled"
        );
    }
    audit_log!("update", RESOURCE, id, format!("status={:?}", updated.status));
    Ok(Json(updated))
}

/// DELETE /api/instagram/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = instagram_post::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}
