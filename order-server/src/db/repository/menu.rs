//! Menu Repository

use chrono::{DateTime, Utc};
use shared::models::MenuItem;
use sqlx::SqlitePool;

use super::RepoResult;

const SELECT_ITEM: &str = "SELECT id, name, price, description, available FROM menu";

/// All menu items, name ascending; optionally only available ones
pub async fn find_all(pool: &SqlitePool, only_available: bool) -> RepoResult<Vec<MenuItem>> {
    let sql = if only_available {
        format!("{SELECT_ITEM} WHERE available = 1 ORDER BY name ASC")
    } else {
        format!("{SELECT_ITEM} ORDER BY name ASC")
    };
    let items = sqlx::query_as::<_, MenuItem>(&sql).fetch_all(pool).await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!("{SELECT_ITEM} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn create(
    pool: &SqlitePool,
    item: &MenuItem,
    now: DateTime<Utc>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO menu (id, name, price, description, available, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(item.price)
    .bind(&item.description)
    .bind(item.available)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM menu WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
