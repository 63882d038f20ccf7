//! Menu 请求处理器
//!
//! 目录变更广播给所有在线连接，不区分房间。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use shared::message::{MenuAction, ServerMessage};
use shared::models::{MenuItem, MenuItemCreate};
use shared::response::{AckEnvelope, ProductEnvelope, ProductListEnvelope};

use crate::core::ServerState;
use crate::db::repository::menu;
use crate::utils::{AppError, AppJson, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub available: Option<bool>,
}

/// GET /api/menu[?available=true]
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ProductListEnvelope>> {
    let products = menu::find_all(&state.pool, query.available == Some(true)).await?;
    Ok(Json(ProductListEnvelope::ok(products)))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<ProductEnvelope>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let item = MenuItem {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        price: payload.price.unwrap_or(0.0),
        description: payload.description,
        available: payload.available.unwrap_or(true),
    };
    menu::create(&state.pool, &item, Utc::now()).await?;

    tracing::info!(product_id = %item.id, name = %item.name, "menu item created");
    state.hub.emit_all(&ServerMessage::MenuUpdated {
        action: MenuAction::Create,
        product_id: item.id.clone(),
        product: Some(item.clone()),
    });

    Ok((StatusCode::CREATED, Json(ProductEnvelope::ok(item))))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AckEnvelope>> {
    if !menu::delete(&state.pool, &id).await? {
        return Err(AppError::not_found("Product not found"));
    }

    tracing::info!(product_id = %id, "menu item deleted");
    state.hub.emit_all(&ServerMessage::MenuUpdated {
        action: MenuAction::Delete,
        product_id: id,
        product: None,
    });

    Ok(Json(AckEnvelope::ok()))
}
