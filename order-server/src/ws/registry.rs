//! Connection Registry
//!
//! Tracks each live WebSocket connection, its outbound channel and the
//! rooms it has joined. Room membership is mutated only by the owning
//! connection's task (join on a join message, removal on disconnect);
//! no other actor touches another connection's membership.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use shared::message::{ServerMessage, UserRole};
use tokio::sync::mpsc;

pub type ConnId = u64;

/// Outbound channel capacity per connection. A full channel means a
/// consumer that cannot keep up with human-scale order traffic; the
/// message is dropped for that connection with a warning.
const OUTBOUND_CAPACITY: usize = 64;

/// A broadcast scope: the global admin room or a single session's room
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    Admin,
    Session(String),
}

impl Room {
    pub fn session(session_id: impl Into<String>) -> Self {
        Room::Session(session_id.into())
    }
}

struct ConnectionHandle {
    tx: mpsc::Sender<ServerMessage>,
    role: Option<UserRole>,
}

/// Registry of live connections and their room membership
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: DashMap<ConnId, ConnectionHandle>,
    rooms: DashMap<Room, HashSet<ConnId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a new connection and hand back its id
    pub fn register(&self, tx: mpsc::Sender<ServerMessage>) -> ConnId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections
            .insert(id, ConnectionHandle { tx, role: None });
        id
    }

    /// Create the outbound channel pair and register the sender side
    pub fn connect(&self) -> (ConnId, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        (self.register(tx), rx)
    }

    /// Record the role a connection declared when joining
    pub fn set_role(&self, conn: ConnId, role: UserRole) {
        if let Some(mut handle) = self.connections.get_mut(&conn) {
            handle.role = Some(role);
        }
    }

    pub fn role(&self, conn: ConnId) -> Option<UserRole> {
        self.connections.get(&conn).and_then(|h| h.role)
    }

    /// Join a room. Must be called by the owning connection's task.
    pub fn join(&self, conn: ConnId, room: Room) {
        self.rooms.entry(room).or_default().insert(conn);
    }

    /// Drop a connection from every room and forget it
    pub fn remove(&self, conn: ConnId) {
        self.connections.remove(&conn);
        self.rooms.retain(|_, members| {
            members.remove(&conn);
            // Rooms with no members are dropped; they reappear on the
            // next join
            !members.is_empty()
        });
    }

    /// Current members of a room
    pub fn members(&self, room: &Room) -> Vec<ConnId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of every live connection
    pub fn all_connections(&self) -> Vec<ConnId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Queue a message on one connection's outbound channel
    pub fn send_to(&self, conn: ConnId, msg: ServerMessage) -> bool {
        let Some(handle) = self.connections.get(&conn) else {
            return false;
        };
        match handle.tx.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn, "Outbound channel full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
