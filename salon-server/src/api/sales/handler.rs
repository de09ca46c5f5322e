//! Sales API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{
    SalesGoals, SalesGoalsUpdate, SalesRecord, SalesRecordCreate, SalesRecordUpdate, SummaryMetrics,
};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::{sales_goals, sales_record};
use crate::utils::validation::validate_amount;
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "sales_record";

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// day | week | month | year, defaults to day
    #[serde(default = "default_period")]
    pub period: String,
    /// YYYY-MM-DD, defaults to today in the business timezone
    pub date: Option<String>,
}

fn default_period() -> String {
    "day".into()
}

/// GET /api/sales - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SalesRecord>>> {
    let records = sales_record::find_all(&state.pool).await?;
    Ok(Json(records))
}

/// GET /api/sales/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SalesRecord>> {
    let found = sales_record::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::SalesRecordNotFound, format!("Sales record {id} not found"))
        })?;
    Ok(Json(found))
}

/// POST /api/sales
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SalesRecordCreate>,
) -> AppResult<Json<SalesRecord>> {
    validate_amount(payload.amount, "amount")?;

    let created = sales_record::create(&state.pool, payload).await?;
    audit_log!(
        "create",
        RESOURCE,
        created.id,
        format!("amount={} method={}", created.amount, created.payment_method.as_str())
    );
    Ok(Json(created))
}

/// PUT /api/sales/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SalesRecordUpdate>,
) -> AppResult<Json<SalesRecord>> {
    if let Some(amount) = payload.amount {
        validate_amount(amount, "amount")?;
    }

    let updated = sales_record::update(&state.pool, id, payload).await?;
    audit_log!("update", RESOURCE, id, format!("status={:?}", updated.status));
    Ok(Json(updated))
}

/// DELETE /api/sales/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    let deleted = sales_record::delete(&state.pool, id).await?;
    if deleted {
        audit_log!("delete", RESOURCE, id);
    }
    Ok(Json(deleted))
}

/// GET /api/sales/summary?period&date
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<SummaryMetrics>> {
    let metrics = state
        .reporter()
        .summary(&query.period, query.date.as_deref())
        .await?;
    Ok(Json(metrics))
}

/// GET /api/sales/goals
pub async fn get_goals(State(state): State<ServerState>) -> AppResult<Json<SalesGoals>> {
    let goals = sales_goals::get(&state.pool).await?;
    Ok(Json(goals))
}

/// PUT /api/sales/goals - replace all goals
pub async fn replace_goals(
    State(state): State<ServerState>,
    Json(payload): Json<SalesGoalsUpdate>,
) -> AppResult<Json<SalesGoals>> {
    let goals = sales_goals::replace(&state.pool, payload).await?;
    audit_log!(
        "update",
        "sales_goals",
        1,
        format!("monthly_sales={} monthly_customers={}", goals.monthly_sales, goals.monthly_customers)
    );
    Ok(Json(goals))
}
