//! 订单生命周期服务
//!
//! 下单与状态更新的唯一实现。持久化成功后才广播；持久化失败的
//! 操作不产生任何出站消息。

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use shared::message::ServerMessage;
use shared::models::{EventType, Order, OrderItem, OrderItemInput, OrderStatus};

use crate::core::StatusPolicy;
use crate::db::repository::{event, order, session};
use crate::utils::{AppError, AppResult};
use crate::ws::{BroadcastHub, Room};

/// 下单请求（两条入口共用的规范化形式）
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub session_id: String,
    pub items: Vec<OrderItemInput>,
    pub customer_notes: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Σ price × quantity over the normalized items
fn total_amount(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum()
}

pub struct OrderService {
    pool: SqlitePool,
    hub: BroadcastHub,
    policy: StatusPolicy,
}

impl OrderService {
    pub fn new(pool: SqlitePool, hub: BroadcastHub, policy: StatusPolicy) -> Self {
        Self { pool, hub, policy }
    }

    /// 创建订单
    ///
    /// 订单行、汇总行与 `orderPlaced` 事件在同一事务内写入。
    /// 提交成功后向会话房间和后台房间广播同一份 `newOrder`。
    ///
    /// 携带重复 idempotencyKey 的请求返回已存在的订单，不再写库
    /// 也不再广播。
    pub async fn create_order(&self, input: CreateOrder) -> AppResult<Order> {
        if input.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }
        if !session::exists(&self.pool, &input.session_id).await? {
            return Err(AppError::not_found("Session not found"));
        }

        if let Some(key) = input.idempotency_key.as_deref() {
            if let Some(existing) = order::find_by_idempotency_key(&self.pool, key).await? {
                tracing::info!(order_id = %existing.order_id, key, "duplicate order attempt");
                return Ok(existing);
            }
        }

        let items: Vec<OrderItem> = input.items.iter().map(OrderItemInput::normalize).collect();
        let total = total_amount(&items);
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let inserted = sqlx::query(
            "INSERT INTO orders (order_id, session_id, status, total_amount, customer_notes, \
             admin_notes, idempotency_key, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order_id)
        .bind(&input.session_id)
        .bind(OrderStatus::Pending)
        .bind(total)
        .bind(input.customer_notes.as_deref().unwrap_or(""))
        .bind("")
        .bind(input.idempotency_key.as_deref())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            // Two in-flight requests with the same key: the loser of
            // the UNIQUE race returns the winner's order
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique && input.idempotency_key.is_some() {
                drop(tx);
                let key = input.idempotency_key.as_deref().unwrap_or_default();
                if let Some(existing) = order::find_by_idempotency_key(&self.pool, key).await? {
                    return Ok(existing);
                }
            }
            return Err(AppError::from(e));
        }

        for item in &items {
            sqlx::query(
                "INSERT INTO order_items (order_id, item_name, quantity, price, notes) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&order_id)
            .bind(&item.item_name)
            .bind(item.quantity)
            .bind(item.price)
            .bind(&item.notes)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;
        }

        let data = serde_json::json!({
            "orderId": order_id,
            "items": items,
            "totalAmount": total,
        });
        event::append(
            &mut *tx,
            &input.session_id,
            EventType::OrderPlaced,
            Some(&order_id),
            &data,
            now,
        )
        .await?;

        tx.commit().await.map_err(AppError::from)?;

        let order = order::find_by_id(&self.pool, &order_id)
            .await?
            .ok_or_else(|| AppError::internal("Order vanished after insert"))?;

        tracing::info!(order_id = %order.order_id, session_id = %order.session_id,
            total = order.total_amount, "order created");

        self.hub.emit_order_event(
            &order.session_id,
            &ServerMessage::NewOrder {
                order: order.clone(),
            },
        );

        Ok(order)
    }

    /// 更新订单状态
    ///
    /// 单条条件 UPDATE 完成读改写，`admin_notes` 仅在调用方给出时
    /// 覆盖。forward-only 策略把合法前驱编进 WHERE 子句，非法跃迁
    /// 在库内被原子拒绝。
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        admin_notes: Option<String>,
    ) -> AppResult<Order> {
        let now = Utc::now();

        let rows = match self.policy {
            StatusPolicy::Permissive => sqlx::query(
                "UPDATE orders SET status = ?, admin_notes = COALESCE(?, admin_notes), \
                 updated_at = ? WHERE order_id = ?",
            )
            .bind(status)
            .bind(admin_notes.as_deref())
            .bind(now)
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?
            .rows_affected(),
            StatusPolicy::ForwardOnly => {
                let predecessors = OrderStatus::forward_only_predecessors(status);
                if predecessors.is_empty() {
                    // No state may move here (e.g. back to pending)
                    return match order::find_by_id(&self.pool, order_id).await? {
                        None => Err(AppError::not_found("Order not found")),
                        Some(order) => Err(AppError::validation(format!(
                            "Cannot move order from {} to {}",
                            order.status, status
                        ))),
                    };
                }
                let placeholders = vec!["?"; predecessors.len()].join(", ");
                let sql = format!(
                    "UPDATE orders SET status = ?, admin_notes = COALESCE(?, admin_notes), \
                     updated_at = ? WHERE order_id = ? AND status IN ({placeholders})"
                );
                let mut query = sqlx::query(&sql)
                    .bind(status)
                    .bind(admin_notes.as_deref())
                    .bind(now)
                    .bind(order_id);
                for from in predecessors {
                    query = query.bind(from);
                }
                query
                    .execute(&self.pool)
                    .await
                    .map_err(AppError::from)?
                    .rows_affected()
            }
        };

        if rows == 0 {
            // Missing order and rejected transition both come back as
            // zero rows; one extra read tells them apart
            return match order::find_by_id(&self.pool, order_id).await? {
                None => Err(AppError::not_found("Order not found")),
                Some(order) => Err(AppError::validation(format!(
                    "Cannot move order from {} to {}",
                    order.status, status
                ))),
            };
        }

        let order = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::internal("Order vanished after update"))?;

        let data = serde_json::json!({
            "status": status,
            "adminNotes": admin_notes,
        });
        if let Err(e) = event::append(
            &self.pool,
            &order.session_id,
            EventType::UpdateOrderStatus,
            Some(order_id),
            &data,
            now,
        )
        .await
        {
            tracing::error!(order_id, "Failed to record status event: {e}");
        }

        tracing::info!(order_id, status = %status, "order status updated");

        self.hub.emit_to_room(
            &Room::session(&order.session_id),
            &ServerMessage::StatusUpdated {
                order_id: order_id.to_string(),
                status,
                admin_notes: admin_notes.clone(),
                order: order.clone(),
            },
        );
        self.hub.emit_to_room(
            &Room::Admin,
            &ServerMessage::OrderStatusUpdated {
                order_id: order_id.to_string(),
                status,
                order: order.clone(),
            },
        );

        Ok(order)
    }
}
