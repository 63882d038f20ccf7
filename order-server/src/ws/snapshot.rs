//! Snapshot Provider
//!
//! Computes the one-time state dump a connection receives right after
//! joining a room. The caller registers room membership before
//! requesting the snapshot, and both travel the same ordered
//! per-connection channel. An update landing between the two steps is
//! queued ahead of the snapshot, and the snapshot read that follows
//! already reflects it: the client may observe such a change twice,
//! never zero times.

use shared::message::ServerMessage;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, order};

/// Global admin view: the most recent orders across all sessions
const ADMIN_SNAPSHOT_CAP: i64 = 100;

/// Snapshot for a connection joining the admin room
pub async fn for_admin(pool: &SqlitePool) -> RepoResult<ServerMessage> {
    let orders = order::find_recent(pool, ADMIN_SNAPSHOT_CAP).await?;
    Ok(ServerMessage::InitialOrders { orders })
}

/// Snapshot for an admin narrowly viewing one session: every order of
/// that session, newest first, uncapped
pub async fn for_session_admin(
    pool: &SqlitePool,
    session_id: &str,
) -> RepoResult<ServerMessage> {
    let orders = order::find_by_session(pool, session_id).await?;
    Ok(ServerMessage::InitialOrders { orders })
}
