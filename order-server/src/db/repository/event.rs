//! Event Repository
//!
//! Append-only: there is no update or delete here. Rows disappear only
//! through the session-delete cascade policy.

use chrono::{DateTime, Utc};
use shared::models::{Event, EventType};
use sqlx::{Sqlite, SqlitePool};

use super::RepoResult;

/// Raw row; `data` is JSON text in the store
#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    session_id: String,
    event_type: EventType,
    order_id: Option<String>,
    data: Option<String>,
    timestamp: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self) -> Event {
        let data = self
            .data
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| serde_json::json!({}));
        Event {
            id: self.id,
            session_id: self.session_id,
            event_type: self.event_type,
            order_id: self.order_id,
            data,
            timestamp: self.timestamp,
        }
    }
}

/// Append one event. Takes any executor so the lifecycle service can
/// append inside its transaction.
pub async fn append<'e, E>(
    db: E,
    session_id: &str,
    event_type: EventType,
    order_id: Option<&str>,
    data: &serde_json::Value,
    timestamp: DateTime<Utc>,
) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO events (session_id, event_type, order_id, data, timestamp) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(session_id)
    .bind(event_type)
    .bind(order_id)
    .bind(data.to_string())
    .bind(timestamp)
    .execute(db)
    .await?;
    Ok(())
}

/// Most recent events for a session, capped
pub async fn find_by_session(
    pool: &SqlitePool,
    session_id: &str,
    limit: i64,
) -> RepoResult<Vec<Event>> {
    let rows = sqlx::query_as::<_, EventRow>(
        "SELECT id, session_id, event_type, order_id, data, timestamp FROM events \
         WHERE session_id = ? ORDER BY timestamp DESC LIMIT ?",
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(EventRow::into_event).collect())
}

/// Events referencing a session (any order), used to verify cascade
/// behavior
pub async fn count_by_session(pool: &SqlitePool, session_id: &str) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE session_id = ?")
        .bind(session_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
