//! Broadcast Hub
//!
//! Fans a server message out to the connections currently joined to
//! the target room(s). Each member receives a clone of the same
//! message; serialization happens once per connection in its writer
//! task.
//!
//! Delivery ordering across different connections is not sequenced:
//! two near-simultaneous mutations may be observed by different
//! subscribers in different relative orders. Acceptable for
//! human-scale order updates.

use std::sync::Arc;

use shared::message::ServerMessage;

use super::registry::{ConnId, ConnectionRegistry, Room};

#[derive(Clone)]
pub struct BroadcastHub {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Emit to every current member of one room
    pub fn emit_to_room(&self, room: &Room, msg: &ServerMessage) {
        for conn in self.registry.members(room) {
            self.registry.send_to(conn, msg.clone());
        }
    }

    /// Dual-room fan-out for order-affecting events: the owning
    /// session's room and the admin room receive an identical payload.
    pub fn emit_order_event(&self, session_id: &str, msg: &ServerMessage) {
        self.emit_to_room(&Room::session(session_id), msg);
        self.emit_to_room(&Room::Admin, msg);
    }

    /// Emit to every connected client, joined or not (catalog changes)
    pub fn emit_all(&self, msg: &ServerMessage) {
        for conn in self.registry.all_connections() {
            self.registry.send_to(conn, msg.clone());
        }
    }

    /// Point-to-point message back to one connection
    pub fn send_to(&self, conn: ConnId, msg: ServerMessage) {
        self.registry.send_to(conn, msg);
    }
}
