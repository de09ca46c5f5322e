//! Counseling Sheet Repository

use super::{RepoError, RepoResult, like_pattern};
use shared::models::{
    CounselingSheet, CounselingSheetCreate, CounselingSheetUpdate, CounselingStatus,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT: &str = "SELECT h.id, h.customer_id, h.status, h.concerns, h.allergies, h.preferences, h.notes, h.created_at, h.updated_at, c.name AS customer_name, c.email AS customer_email, c.phone AS customer_phone FROM counseling_sheet h LEFT JOIN customer c ON c.id = h.customer_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CounselingSheet>> {
    let sql = format!("{SELECT} ORDER BY h.created_at DESC, h.id DESC");
    let sheets = sqlx::query_as::<_, CounselingSheet>(&sql).fetch_all(pool).await?;
    Ok(sheets)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CounselingSheet>> {
    let sql = format!("{SELECT} WHERE h.id = ?");
    let sheet = sqlx::query_as::<_, CounselingSheet>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(sheet)
}

/// Filter by customer name / email / phone substring and by status
pub async fn search(
    pool: &SqlitePool,
    query: Option<&str>,
    status: Option<CounselingStatus>,
) -> RepoResult<Vec<CounselingSheet>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
    builder.push(" WHERE 1 = 1");

    if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
        let pattern = like_pattern(q);
        builder.push(" AND (c.name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR c.email LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR c.phone LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }
    if let Some(status) = status {
        builder.push(" AND h.status = ");
        builder.push_bind(status);
    }
    builder.push(" ORDER BY h.created_at DESC, h.id DESC");

    let sheets = builder
        .build_query_as::<CounselingSheet>()
        .fetch_all(pool)
        .await?;
    Ok(sheets)
}

pub async fn create(pool: &SqlitePool, data: CounselingSheetCreate) -> RepoResult<CounselingSheet> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO counseling_sheet (id, customer_id, status, concerns, allergies, preferences, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.customer_id)
    .bind(data.status)
    .bind(data.concerns)
    .bind(data.allergies)
    .bind(data.preferences)
    .bind(data.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create counseling sheet".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CounselingSheetUpdate,
) -> RepoResult<CounselingSheet> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE counseling_sheet SET status = COALESCE(?, status), concerns = COALESCE(?, concerns), allergies = COALESCE(?, allergies), preferences = COALESCE(?, preferences), notes = COALESCE(?, notes), updated_at = ? WHERE id = ?",
    )
    .bind(data.status)
    .bind(data.concerns)
    .bind(data.allergies)
    .bind(data.preferences)
    .bind(data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Counseling sheet {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Counseling sheet {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM counseling_sheet WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::appointment::tests::seed;

    fn sheet(customer_id: i64, status: CounselingStatus) -> CounselingSheetCreate {
        CounselingSheetCreate {
            customer_id,
            status,
            concerns: Some("爪が割れやすい".into()),
            allergies: None,
            preferences: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn search_by_customer_and_status() {
        let db = DbService::open_in_memory().await.unwrap();
        let (_, customer_id) = seed(&db.pool).await;
        create(&db.pool, sheet(customer_id, CounselingStatus::Draft)).await.unwrap();
        create(&db.pool, sheet(customer_id, CounselingStatus::Completed)).await.unwrap();

        let all = search(&db.pool, Some("tana"), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].customer_name.as_deref(), Some("Tanaka"));

        let drafts = search(&db.pool, None, Some(CounselingStatus::Draft)).await.unwrap();
        assert_eq!(drafts.len(), 1);

        assert!(search(&db.pool, Some("nobody"), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_customer_is_rejected() {
        let db = DbService::open_in_memory().await.unwrap();
        let err = create(&db.pool, sheet(12345, CounselingStatus::Draft)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
