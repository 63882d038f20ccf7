//! WebSocket layer: connection registry, room broadcast, snapshots
//!
//! A connection joins one or more rooms; every order-affecting domain
//! event is fanned out to the owning session's room and to the global
//! admin room with an identical payload. Audience separation comes
//! entirely from room membership, never from payload filtering.

pub mod connection;
pub mod hub;
pub mod registry;
pub mod snapshot;

pub use connection::handler;
pub use hub::BroadcastHub;
pub use registry::{ConnId, ConnectionRegistry, Room};
