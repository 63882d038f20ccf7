//! REST response envelopes
//!
//! Every REST body carries a `success` flag plus either the payload or
//! an `error` message:
//!
//! ```json
//! {"success": true, "order": { ... }}
//! {"success": false, "error": "Order not found"}
//! ```
//!
//! The envelopes derive `Deserialize` as well so clients and tests can
//! consume them directly.

use serde::{Deserialize, Serialize};

use crate::models::{Event, MenuItem, Order, Session};

macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $field:ident: $ty:ty) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize)]
        pub struct $name {
            pub success: bool,
            pub $field: $ty,
        }

        impl $name {
            pub fn ok($field: $ty) -> Self {
                Self {
                    success: true,
                    $field,
                }
            }
        }
    };
}

envelope!(SessionEnvelope, session: Session);
envelope!(SessionListEnvelope, sessions: Vec<Session>);
envelope!(OrderEnvelope, order: Order);
envelope!(OrderListEnvelope, orders: Vec<Order>);
envelope!(EventListEnvelope, events: Vec<Event>);
envelope!(ProductEnvelope, product: MenuItem);
envelope!(ProductListEnvelope, products: Vec<MenuItem>);

/// Bare acknowledgment, optionally with a human-readable message
#[derive(Debug, Serialize, Deserialize)]
pub struct AckEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AckEnvelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
