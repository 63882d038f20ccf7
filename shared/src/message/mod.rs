//! WebSocket protocol for customer/admin ↔ server duplex communication
//!
//! JSON text frames, internally tagged with `type`:
//!
//! Client → Server: joinAdmin, joinSession, orderPlaced, buttonClicked,
//! itemSelected, customerTyping, updateOrderStatus, adminMessage
//!
//! Server → Client: joinedAdmin, joinedSession, initialOrders, newOrder,
//! orderConfirmed, customerEvent, statusUpdated, orderStatusUpdated,
//! adminEvent, menuUpdated, error

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MenuItem, Order, OrderItemInput, OrderStatus};

/// Role a connection declares when joining a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
}

/// Client → Server messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join the global admin room (dashboard view of every session)
    JoinAdmin,

    /// Join a single session's room as admin or customer
    JoinSession {
        session_id: String,
        user_type: UserRole,
    },

    /// Place an order. `idempotency_key` dedupes client retries after a
    /// timeout: the same key always resolves to the same order.
    OrderPlaced {
        session_id: String,
        items: Vec<OrderItemInput>,
        #[serde(default)]
        customer_notes: Option<String>,
        #[serde(default)]
        idempotency_key: Option<String>,
    },

    /// Ephemeral UI ping — audited but not state-changing
    ButtonClicked {
        session_id: String,
        button_id: String,
        button_label: String,
    },

    /// Ephemeral UI ping — audited but not state-changing
    ItemSelected {
        session_id: String,
        item_id: String,
        item_name: String,
        selected: bool,
    },

    /// Ephemeral typing indicator — never persisted
    CustomerTyping {
        session_id: String,
        is_typing: bool,
    },

    /// Admin moves an order through its lifecycle
    UpdateOrderStatus {
        order_id: String,
        status: OrderStatus,
        #[serde(default)]
        admin_notes: Option<String>,
    },

    /// Free-text admin message to one session
    AdminMessage {
        session_id: String,
        message: String,
    },
}

/// Ephemeral customer activity, fanned out to the session room and the
/// admin room with an identical payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEvent {
    pub kind: CustomerEventKind,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_typing: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerEventKind {
    ButtonClicked,
    ItemSelected,
    CustomerTyping,
}

impl CustomerEvent {
    fn base(kind: CustomerEventKind, session_id: String) -> Self {
        Self {
            kind,
            session_id,
            button_id: None,
            button_label: None,
            item_id: None,
            item_name: None,
            selected: None,
            is_typing: None,
            timestamp: Utc::now(),
        }
    }

    pub fn button_clicked(session_id: String, button_id: String, button_label: String) -> Self {
        Self {
            button_id: Some(button_id),
            button_label: Some(button_label),
            ..Self::base(CustomerEventKind::ButtonClicked, session_id)
        }
    }

    pub fn item_selected(
        session_id: String,
        item_id: String,
        item_name: String,
        selected: bool,
    ) -> Self {
        Self {
            item_id: Some(item_id),
            item_name: Some(item_name),
            selected: Some(selected),
            ..Self::base(CustomerEventKind::ItemSelected, session_id)
        }
    }

    pub fn typing(session_id: String, is_typing: bool) -> Self {
        Self {
            is_typing: Some(is_typing),
            ..Self::base(CustomerEventKind::CustomerTyping, session_id)
        }
    }
}

/// Action carried by a catalog-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuAction {
    Create,
    Delete,
}

/// Server → Client messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Ack for joinAdmin
    JoinedAdmin { user_type: UserRole },

    /// Ack for joinSession
    JoinedSession {
        session_id: String,
        user_type: UserRole,
    },

    /// One-time snapshot delivered right after an admin join, before any
    /// live events are forwarded
    InitialOrders { orders: Vec<Order> },

    /// A new order landed (session room + admin room)
    NewOrder { order: Order },

    /// Point-to-point ack to the placing connection
    OrderConfirmed { order_id: String, order: Order },

    /// Ephemeral customer activity
    CustomerEvent(CustomerEvent),

    /// Status change as seen by the session room
    StatusUpdated {
        order_id: String,
        status: OrderStatus,
        admin_notes: Option<String>,
        order: Order,
    },

    /// Status change as seen by the admin room (and the updating admin)
    OrderStatusUpdated {
        order_id: String,
        status: OrderStatus,
        order: Order,
    },

    /// Admin free-text message to a session
    AdminEvent {
        kind: AdminEventKind,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Catalog changed — broadcast to every connection
    MenuUpdated {
        action: MenuAction,
        product_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        product: Option<MenuItem>,
    },

    /// Structured error to the originating connection only
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdminEventKind {
    AdminMessage,
}
