//! Event log model — append-only audit trail
//!
//! Events record that something happened; they are never consulted to
//! rebuild snapshots or to re-deliver after a reconnect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain occurrences worth auditing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub enum EventType {
    OrderPlaced,
    ButtonClicked,
    ItemSelected,
    CustomerTyping,
    UpdateOrderStatus,
    AdminMessage,
    StatusUpdated,
    AdminEvent,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OrderPlaced => "orderPlaced",
            EventType::ButtonClicked => "buttonClicked",
            EventType::ItemSelected => "itemSelected",
            EventType::CustomerTyping => "customerTyping",
            EventType::UpdateOrderStatus => "updateOrderStatus",
            EventType::AdminMessage => "adminMessage",
            EventType::StatusUpdated => "statusUpdated",
            EventType::AdminEvent => "adminEvent",
        }
    }
}

/// One audit record. `id` is the store's auto-incrementing sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub session_id: String,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Opaque structured payload (stored as JSON text)
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
