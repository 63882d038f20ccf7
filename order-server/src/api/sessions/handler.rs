//! Session 请求处理器

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use shared::models::{Session, SessionCreate, SessionUpdate};
use shared::response::{AckEnvelope, SessionEnvelope, SessionListEnvelope};

use crate::core::ServerState;
use crate::db::repository::session;
use crate::utils::{AppError, AppJson, AppResult};

/// POST /api/sessions/create
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<SessionCreate>,
) -> AppResult<Json<SessionEnvelope>> {
    let session_id = Uuid::new_v4().to_string();
    let name = payload
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Session {}", &session_id[..8]));
    let now = Utc::now();

    let record = Session {
        session_id,
        name,
        table_number: payload.table_number,
        is_active: true,
        customer_url: None,
        created_at: now,
        updated_at: now,
    };
    session::create(&state.pool, &record).await?;

    tracing::info!(session_id = %record.session_id, "session created");
    Ok(Json(SessionEnvelope::ok(
        record.with_customer_url(&state.config.frontend_url),
    )))
}

/// GET /api/sessions/all
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<SessionListEnvelope>> {
    let sessions = session::find_all(&state.pool)
        .await?
        .into_iter()
        .map(|s| s.with_customer_url(&state.config.frontend_url))
        .collect();
    Ok(Json(SessionListEnvelope::ok(sessions)))
}

/// GET /api/sessions/{session_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<SessionEnvelope>> {
    let record = session::find_by_id(&state.pool, &session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;
    Ok(Json(SessionEnvelope::ok(
        record.with_customer_url(&state.config.frontend_url),
    )))
}

/// PUT /api/sessions/{session_id}
pub async fn update(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
    AppJson(changes): AppJson<SessionUpdate>,
) -> AppResult<Json<SessionEnvelope>> {
    let record = session::update(&state.pool, &session_id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;
    Ok(Json(SessionEnvelope::ok(
        record.with_customer_url(&state.config.frontend_url),
    )))
}

/// DELETE /api/sessions/{session_id}
///
/// 连带删除该会话的订单与订单项；事件是否一并删除由
/// `CASCADE_EVENTS` 配置决定。
pub async fn delete(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<AckEnvelope>> {
    let removed =
        session::delete(&state.pool, &session_id, state.config.cascade_events).await?;
    if !removed {
        return Err(AppError::not_found("Session not found"));
    }
    tracing::info!(session_id = %session_id, "session deleted");
    Ok(Json(AckEnvelope::ok_with_message("Session deleted")))
}
