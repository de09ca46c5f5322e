//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "customer";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer {id} not found"))
}

fn validate_contact(
    email: &Option<String>,
    phone: &Option<String>,
    birthday: &Option<String>,
    notes: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    if let Some(b) = birthday
        && chrono::NaiveDate::parse_from_str(b, "%Y-%m-%d").is_err()
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("birthday must be YYYY-MM-DD, got '{b}'"),
        ));
    }
    Ok(())
}

/// GET /api/customers - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(&state.pool).await?;
    Ok(Json(customers))
}

/// GET /api/customers/search?q - substring match on name, email, phone
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let q = query.q.trim();
    let customers = if q.is_empty() {
        customer::find_all(&state.pool).await?
    } else {
        customer::search(&state.pool, q).await?
    };
    Ok(Json(customers))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(found))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_contact(&payload.email, &payload.phone, &payload.birthday, &payload.notes)?;

    let created = customer::create(&state.pool, payload).await?;
    audit_log!("create", RESOURCE, created.id);
    Ok(Json(created))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_contact(&payload.email, &payload.phone, &payload.birthday, &payload.notes)?;

    let updated = customer::update(&state.pool, id, payload).await?;
    audit_log!("update", RESOURCE, id);
    Ok(Json(updated))
}

/// DELETE /api/customers/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = customer::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}
