//! Staff Repository

use super::{RepoError, RepoResult};
use shared::models::{Staff, StaffCreate, StaffUpdate};
use sqlx::SqlitePool;

const SELECT: &str =
    "SELECT id, name, email, phone, role, is_active, created_at, updated_at FROM staff";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Staff>> {
    let sql = format!("{SELECT} ORDER BY name ASC, id ASC");
    let staff = sqlx::query_as::<_, Staff>(&sql).fetch_all(pool).await?;
    Ok(staff)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let staff = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(staff)
}

pub async fn create(pool: &SqlitePool, data: StaffCreate) -> RepoResult<Staff> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO staff (id, name, email, phone, role, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(data.name)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StaffUpdate) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff SET name = COALESCE(?, name), email = COALESCE(?, email), phone = COALESCE(?, phone), role = COALESCE(?, role), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.role)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Staff {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM staff WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
