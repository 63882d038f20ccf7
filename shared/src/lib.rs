//! Shared wire types for the table-ordering system
//!
//! This crate holds everything the server and its clients must agree on:
//!
//! - **Models** (`models`): Session, Order, OrderItem, Event, MenuItem
//! - **Message protocol** (`message`): WebSocket client/server messages
//! - **Response envelopes** (`response`): REST `success`-flag bodies
//!
//! All wire names are camelCase; Rust field names stay snake_case and
//! serde does the renaming.

pub mod message;
pub mod models;
pub mod response;

// Re-export the types nearly every consumer needs
pub use message::{
    AdminEventKind, ClientMessage, CustomerEvent, CustomerEventKind, MenuAction, ServerMessage,
    UserRole,
};
pub use models::{
    Event, EventType, MenuItem, Order, OrderItem, OrderItemInput, OrderStatus, Session,
};
