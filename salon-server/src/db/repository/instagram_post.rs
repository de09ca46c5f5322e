//! Instagram Post Repository

use super::{RepoError, RepoResult};
use shared::models::{InstagramPost, InstagramPostCreate, InstagramPostUpdate};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, caption, image_url, status, scheduled_time, published_at, created_at, updated_at FROM instagram_post";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<InstagramPost>> {
    let sql = format!("{SELECT} ORDER BY created_at DESC, id DESC");
    let posts = sqlx::query_as::<_, InstagramPost>(&sql).fetch_all(pool).await?;
    Ok(posts)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<InstagramPost>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let post = sqlx::query_as::<_, InstagramPost>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(post)
}

/// SCHEDULED posts due at or after `now`, soonest first
pub async fn find_scheduled(pool: &SqlitePool, now: i64) -> RepoResult<Vec<InstagramPost>> {
    let sql = format!(
        "{SELECT} WHERE status = 'SCHEDULED' AND scheduled_time >= ? ORDER BY scheduled_time ASC"
    );
    let posts = sqlx::query_as::<_, InstagramPost>(&sql)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

pub async fn create(pool: &SqlitePool, data: InstagramPostCreate) -> RepoResult<InstagramPost> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO instagram_post (id, caption, image_url, status, scheduled_time, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.caption)
    .bind(data.image_url)
    .bind(data.status)
    .bind(data.scheduled_time)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create post".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: InstagramPostUpdate) -> RepoResult<InstagramPost> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE instagram_post SET caption = COALESCE(?, caption), image_url = COALESCE(?, image_url), status = COALESCE(?, status), scheduled_time = COALESCE(?, scheduled_time), published_at = COALESCE(?, published_at), updated_at = ? WHERE id = ?",
    )
    .bind(data.caption)
    .bind(data.image_url)
    .bind(data.status)
    .bind(data.scheduled_time)
    .bind(data.published_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Post {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Post {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM instagram_post WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::PostStatus;

    fn post(status: PostStatus, scheduled_time: Option<i64>) -> InstagramPostCreate {
        InstagramPostCreate {
            caption: "新作デザイン".into(),
            image_url: None,
            status,
            scheduled_time,
        }
    }

    #[tokio::test]
    async fn scheduled_excludes_past_and_other_statuses() {
        let db = DbService::open_in_memory().await.unwrap();
        create(&db.pool, post(PostStatus::Scheduled, Some(2_000))).await.unwrap();
        create(&db.pool, post(PostStatus::Scheduled, Some(1_500))).await.unwrap();
        create(&db.pool, post(PostStatus::Scheduled, Some(500))).await.unwrap();
        create(&db.pool, post(PostStatus::Draft, Some(3_000))).await.unwrap();

        let due: Vec<_> = find_scheduled(&db.pool, 1_000)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.scheduled_time)
            .collect();
        assert_eq!(due, vec![Some(1_500), Some(2_000)]);
    }
}
