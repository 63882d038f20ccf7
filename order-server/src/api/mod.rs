//! HTTP API 模块
//!
//! REST 路由 + `/ws` WebSocket 升级端点。两条入口最终都走
//! [`crate::service::OrderService`]，广播行为一致。

pub mod health;
pub mod menu;
pub mod orders;
pub mod sessions;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;
use crate::ws;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(sessions::router())
        .merge(orders::router())
        .merge(menu::router())
        .route("/ws", get(ws::handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
