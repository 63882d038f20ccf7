//! Health / banner endpoints

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

async fn banner() -> Json<Value> {
    Json(json!({
        "service": "order-server",
        "endpoints": {
            "health": "/health",
            "websocket": "/ws",
            "api": "/api",
        },
    }))
}
