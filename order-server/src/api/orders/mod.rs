//! Order API 模块
//!
//! 固定段路由（all/create/session/events）与 `{order_id}` 捕获段
//! 并存，axum 以最长静态前缀优先匹配。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/all", get(handler::list_recent))
        .route("/session/{session_id}", get(handler::list_by_session))
        .route("/events/{session_id}", get(handler::list_events))
        .route("/{order_id}", get(handler::get_by_id))
        .route("/{order_id}/status", put(handler::update_status))
}
