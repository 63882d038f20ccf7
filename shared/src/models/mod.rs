//! Domain models
//!
//! Each model derives `sqlx::FromRow` for the repository layer and
//! camelCase serde for the wire.

pub mod event;
pub mod menu_item;
pub mod order;
pub mod session;

pub use event::{Event, EventType};
pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{Order, OrderItem, OrderItemInput, OrderStatus, OrderStatusUpdate, ParseStatusError};
pub use session::{Session, SessionCreate, SessionUpdate};
