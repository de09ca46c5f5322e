//! Customer Repository

use super::{RepoError, RepoResult, like_pattern};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, name, email, phone, birthday, notes, created_at, updated_at FROM customer";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!("{SELECT} ORDER BY created_at DESC, id DESC");
    let customers = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(customers)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{SELECT} WHERE id = ?");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(customer)
}

/// Substring match on name, email or phone (case-insensitive for ASCII)
pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Customer>> {
    let pattern = like_pattern(query);
    let sql = format!(
        "{SELECT} WHERE name LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\' OR phone LIKE ?1 ESCAPE '\\' ORDER BY created_at DESC, id DESC"
    );
    let customers = sqlx::query_as::<_, Customer>(&sql)
        .bind(pattern)
        .fetch_all(pool)
        .await?;
    Ok(customers)
}

pub async fn create(pool: &SqlitePool, data: CustomerCreate) -> RepoResult<Customer> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO customer (id, name, email, phone, birthday, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.birthday)
    .bind(data.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?, name), email = COALESCE(?, email), phone = COALESCE(?, phone), birthday = COALESCE(?, birthday), notes = COALESCE(?, notes), updated_at = ? WHERE id = ?",
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.phone)
    .bind(data.birthday)
    .bind(data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_customer(name: &str, email: Option<&str>, phone: Option<&str>) -> CustomerCreate {
        CustomerCreate {
            name: name.into(),
            email: email.map(Into::into),
            phone: phone.map(Into::into),
            birthday: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let db = DbService::open_in_memory().await.unwrap();
        let c = create(&db.pool, new_customer("山田 花子", Some("hanako@example.com"), None))
            .await
            .unwrap();
        assert_eq!(c.name, "山田 花子");

        let updated = update(
            &db.pool,
            c.id,
            CustomerUpdate {
                phone: Some("090-1234-5678".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("090-1234-5678"));
        assert_eq!(updated.email.as_deref(), Some("hanako@example.com"));

        assert!(delete(&db.pool, c.id).await.unwrap());
        assert!(find_by_id(&db.pool, c.id).await.unwrap().is_none());
        assert!(!delete(&db.pool, c.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let db = DbService::open_in_memory().await.unwrap();
        let err = update(&db.pool, 42, CustomerUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn search_matches_name_email_and_phone() {
        let db = DbService::open_in_memory().await.unwrap();
        create(&db.pool, new_customer("Tanaka", Some("t@example.com"), None))
            .await
            .unwrap();
        create(&db.pool, new_customer("Suzuki", None, Some("080-5555-0000")))
            .await
            .unwrap();

        assert_eq!(search(&db.pool, "tanaka").await.unwrap().len(), 1);
        assert_eq!(search(&db.pool, "example.com").await.unwrap().len(), 1);
        assert_eq!(search(&db.pool, "5555").await.unwrap()[0].name, "Suzuki");
        assert!(search(&db.pool, "100%").await.unwrap().is_empty());
    }
}
