//! 业务服务层
//!
//! REST 处理器与 WebSocket 分发器共用同一个订单生命周期服务，
//! 两条入口的验证、持久化与广播行为完全一致。

pub mod orders;

pub use orders::{CreateOrder, OrderService};
