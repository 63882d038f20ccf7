//! Order Repository
//!
//! Order reads always return the order together with its items.

use shared::models::{Order, OrderItem};
use sqlx::SqlitePool;

use super::RepoResult;

const SELECT_ORDER: &str = "SELECT order_id, session_id, status, total_amount, \
     customer_notes, admin_notes, created_at, updated_at FROM orders";

async fn attach_items(pool: &SqlitePool, mut orders: Vec<Order>) -> RepoResult<Vec<Order>> {
    for order in &mut orders {
        order.items = sqlx::query_as::<_, OrderItem>(
            "SELECT item_name, quantity, price, notes FROM order_items WHERE order_id = ? \
             ORDER BY id",
        )
        .bind(&order.order_id)
        .fetch_all(pool)
        .await?;
    }
    Ok(orders)
}

/// One order with its items
pub async fn find_by_id(pool: &SqlitePool, order_id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE order_id = ?"))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(order) => Ok(attach_items(pool, vec![order]).await?.pop()),
        None => Ok(None),
    }
}

/// Most recent orders across all sessions, capped (admin dashboard view)
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<Order>> {
    let orders =
        sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} ORDER BY created_at DESC LIMIT ?"))
            .bind(limit)
            .fetch_all(pool)
            .await?;
    attach_items(pool, orders).await
}

/// All orders for one session, newest first, uncapped
pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "{SELECT_ORDER} WHERE session_id = ? ORDER BY created_at DESC"
    ))
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    attach_items(pool, orders).await
}

/// Look up an order by the idempotency key of the creation attempt
pub async fn find_by_idempotency_key(
    pool: &SqlitePool,
    key: &str,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE idempotency_key = ?"))
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(order) => Ok(attach_items(pool, vec![order]).await?.pop()),
        None => Ok(None),
    }
}
