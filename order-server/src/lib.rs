//! order-server — live order-taking backend
//!
//! Coordinates customers at table sessions with a shared admin
//! dashboard. Mutations arrive through two entry points — a REST API
//! and a persistent WebSocket — and both route through one shared
//! [`OrderService`], which updates the store, appends to the event log
//! and fans the resulting event out to the affected rooms.
//!
//! # Module structure
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── db/            # SQLite 连接池 + 仓储层
//! ├── service/       # 订单生命周期服务 (shared by REST + WS)
//! ├── ws/            # 连接注册表、房间广播、快照
//! ├── api/           # REST 路由和处理器
//! └── utils/         # 错误、日志
//! ```
//!
//! Administrative mutations carry no authentication — a capability
//! check at the API and join boundary is required before production
//! use.

pub mod api;
pub mod core;
pub mod db;
pub mod service;
pub mod utils;
pub mod ws;

// Re-export public types
pub use core::{Config, Server, ServerState, StatusPolicy};
pub use db::DbService;
pub use service::OrderService;
pub use utils::logger::init_logger;
pub use utils::{AppError, AppResult};
pub use ws::{BroadcastHub, ConnectionRegistry, Room};
