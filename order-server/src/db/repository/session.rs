//! Session Repository

use chrono::Utc;
use shared::models::{Session, SessionUpdate};
use sqlx::SqlitePool;

use super::RepoResult;

const SELECT_SESSION: &str = "SELECT session_id, name, table_number, is_active, \
     created_at, updated_at FROM sessions";

/// Insert a new session row
pub async fn create(pool: &SqlitePool, session: &Session) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO sessions (session_id, name, table_number, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&session.session_id)
    .bind(&session.name)
    .bind(&session.table_number)
    .bind(session.is_active)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// All sessions, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(&format!(
        "{SELECT_SESSION} ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}

pub async fn find_by_id(pool: &SqlitePool, session_id: &str) -> RepoResult<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(&format!(
        "{SELECT_SESSION} WHERE session_id = ?"
    ))
    .bind(session_id)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

/// Fast existence probe used by order creation
pub async fn exists(pool: &SqlitePool, session_id: &str) -> RepoResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Partial update: only supplied fields change. Returns the updated
/// session, or None when the id does not resolve.
pub async fn update(
    pool: &SqlitePool,
    session_id: &str,
    changes: &SessionUpdate,
) -> RepoResult<Option<Session>> {
    let now = Utc::now();
    let result = sqlx::query(
        "UPDATE sessions SET \
             name = COALESCE(?, name), \
             table_number = COALESCE(?, table_number), \
             is_active = COALESCE(?, is_active), \
             updated_at = ? \
         WHERE session_id = ?",
    )
    .bind(&changes.name)
    .bind(&changes.table_number)
    .bind(changes.is_active)
    .bind(now)
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, session_id).await
}

/// Delete a session and, transactionally, its orders and order items.
/// Events referencing the session are removed only when
/// `cascade_events` is set; by default they stay queryable.
pub async fn delete(
    pool: &SqlitePool,
    session_id: &str,
    cascade_events: bool,
) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM order_items WHERE order_id IN \
         (SELECT order_id FROM orders WHERE session_id = ?)",
    )
    .bind(session_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM orders WHERE session_id = ?")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    if cascade_events {
        sqlx::query("DELETE FROM events WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
    }

    let result = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
