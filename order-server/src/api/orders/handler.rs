//! Order 请求处理器
//!
//! 写操作全部委托给 [`crate::service::OrderService`]，与 WebSocket
//! 入口共享同一套验证与广播。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::models::{OrderItemInput, OrderStatusUpdate};
use shared::response::{EventListEnvelope, OrderEnvelope, OrderListEnvelope};

use crate::core::ServerState;
use crate::db::repository::{event, order};
use crate::service::CreateOrder;
use crate::utils::{AppError, AppJson, AppResult};

/// 列表读取的统一上限
const LIST_CAP: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub session_id: String,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// POST /api/orders/create
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderEnvelope>)> {
    let order = state
        .orders
        .create_order(CreateOrder {
            session_id: payload.session_id,
            items: payload.items,
            customer_notes: payload.customer_notes,
            idempotency_key: payload.idempotency_key,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(OrderEnvelope::ok(order))))
}

/// GET /api/orders/all — 跨会话最近订单（后台总览）
pub async fn list_recent(
    State(state): State<ServerState>,
) -> AppResult<Json<OrderListEnvelope>> {
    let orders = order::find_recent(&state.pool, LIST_CAP).await?;
    Ok(Json(OrderListEnvelope::ok(orders)))
}

/// GET /api/orders/session/{session_id} — 单会话全部订单，不设上限
pub async fn list_by_session(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<OrderListEnvelope>> {
    let orders = order::find_by_session(&state.pool, &session_id).await?;
    Ok(Json(OrderListEnvelope::ok(orders)))
}

/// GET /api/orders/{order_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderEnvelope>> {
    let order = order::find_by_id(&state.pool, &order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(Json(OrderEnvelope::ok(order)))
}

/// PUT /api/orders/{order_id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> AppResult<Json<OrderEnvelope>> {
    let order = state
        .orders
        .update_status(&order_id, payload.status, payload.admin_notes)
        .await?;
    Ok(Json(OrderEnvelope::ok(order)))
}

/// GET /api/orders/events/{session_id} — 会话事件日志，新→旧
pub async fn list_events(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<EventListEnvelope>> {
    let events = event::find_by_session(&state.pool, &session_id, LIST_CAP).await?;
    Ok(Json(EventListEnvelope::ok(events)))
}
