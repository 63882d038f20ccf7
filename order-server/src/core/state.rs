use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::service::OrderService;
use crate::utils::AppResult;
use crate::ws::{BroadcastHub, ConnectionRegistry};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | registry | WebSocket 连接注册表 (房间成员关系的唯一所有者) |
/// | hub | 房间广播 |
/// | orders | 订单生命周期服务 (REST 与 WebSocket 共用) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub registry: Arc<ConnectionRegistry>,
    pub hub: BroadcastHub,
    pub orders: Arc<OrderService>,
}

impl ServerState {
    /// 初始化服务器状态（打开数据库并装配各服务）
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// Assemble state around an existing pool (tests use an in-memory
    /// database here)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = BroadcastHub::new(registry.clone());
        let orders = Arc::new(OrderService::new(
            pool.clone(),
            hub.clone(),
            config.status_policy,
        ));

        Self {
            config,
            pool,
            registry,
            hub,
            orders,
        }
    }
}
