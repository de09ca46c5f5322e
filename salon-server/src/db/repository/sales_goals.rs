//! Sales Goals Repository (singleton row)

use super::{RepoError, RepoResult};
use shared::models::{SalesGoals, SalesGoalsUpdate};
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> RepoResult<SalesGoals> {
    let goals = sqlx::query_as::<_, SalesGoals>(
        "SELECT monthly_sales, monthly_customers, monthly_new_customers, target_average_transaction, updated_at FROM sales_goals WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    // Row is seeded by the initial migration; treat a missing row as "no goals"
    Ok(goals.unwrap_or_default())
}

pub async fn replace(pool: &SqlitePool, data: SalesGoalsUpdate) -> RepoResult<SalesGoals> {
    for (field, value) in [
        ("monthly_sales", data.monthly_sales),
        ("monthly_customers", data.monthly_customers),
        ("monthly_new_customers", data.monthly_new_customers),
        ("target_average_transaction", data.target_average_transaction),
    ] {
        if value < 0 {
            return Err(RepoError::Validation(format!(
                "{field} cannot be negative: {value}"
            )));
        }
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO sales_goals (id, monthly_sales, monthly_customers, monthly_new_customers, target_average_transaction, updated_at) VALUES (1, ?1, ?2, ?3, ?4, ?5) ON CONFLICT (id) DO UPDATE SET monthly_sales = ?1, monthly_customers = ?2, monthly_new_customers = ?3, target_average_transaction = ?4, updated_at = ?5",
    )
    .bind(data.monthly_sales)
    .bind(data.monthly_customers)
    .bind(data.monthly_new_customers)
    .bind(data.target_average_transaction)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool).await
}
