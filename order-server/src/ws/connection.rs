//! WebSocket connection handler
//!
//! One task per connection: a writer task drains the outbound channel
//! into the socket while this task reads inbound frames and dispatches
//! them. Store access runs on the async pool, so a slow write never
//! stalls unrelated room traffic.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use chrono::Utc;
use futures::{SinkExt, StreamExt};

use shared::message::{
    AdminEventKind, ClientMessage, CustomerEvent, ServerMessage, UserRole,
};
use shared::models::EventType;

use crate::core::ServerState;
use crate::db::repository::event;
use crate::service::CreateOrder;
use crate::ws::registry::{ConnId, Room};
use crate::ws::snapshot;

/// GET /ws — upgrade to WebSocket
pub async fn handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: ServerState) {
    let (conn, mut rx) = state.registry.connect();
    tracing::info!(conn, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    // Writer task: outbound channel -> socket
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!("Failed to serialize outbound message: {e}"),
            }
        }
    });

    // Read loop
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatch(&state, conn, &text).await,
            Ok(Message::Close(_)) | Err(_) => break,
            // Axum answers pings itself
            Ok(_) => {}
        }
    }

    // Disconnect silently removes the connection from all its rooms
    let role = state.registry.role(conn);
    state.registry.remove(conn);
    writer.abort();
    tracing::info!(conn, ?role, "WebSocket disconnected");
}

/// Dispatch one inbound text frame
///
/// Mutating operations that fail answer the originating connection with
/// a structured `error` message; best-effort operations (typing, UI
/// pings, admin free text) swallow failures with server-side logging
/// only.
pub async fn dispatch(state: &ServerState, conn: ConnId, text: &str) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!(conn, "Invalid client message: {e}");
            state.hub.send_to(
                conn,
                ServerMessage::Error {
                    message: format!("Invalid message: {e}"),
                },
            );
            return;
        }
    };

    match msg {
        ClientMessage::JoinAdmin => join_admin(state, conn).await,
        ClientMessage::JoinSession {
            session_id,
            user_type,
        } => join_session(state, conn, session_id, user_type).await,
        ClientMessage::OrderPlaced {
            session_id,
            items,
            customer_notes,
            idempotency_key,
        } => {
            let input = CreateOrder {
                session_id,
                items,
                customer_notes,
                idempotency_key,
            };
            match state.orders.create_order(input).await {
                Ok(order) => {
                    // Point-to-point confirmation to the placing customer;
                    // the room fan-out already happened in the service
                    state.hub.send_to(
                        conn,
                        ServerMessage::OrderConfirmed {
                            order_id: order.order_id.clone(),
                            order,
                        },
                    );
                }
                Err(e) => {
                    state.hub.send_to(
                        conn,
                        ServerMessage::Error {
                            message: format!("Failed to place order: {}", e.client_message()),
                        },
                    );
                }
            }
        }
        ClientMessage::ButtonClicked {
            session_id,
            button_id,
            button_label,
        } => {
            let data = serde_json::json!({
                "buttonId": button_id,
                "buttonLabel": button_label,
            });
            log_ephemeral(state, &session_id, EventType::ButtonClicked, &data).await;
            let payload = ServerMessage::CustomerEvent(CustomerEvent::button_clicked(
                session_id.clone(),
                button_id,
                button_label,
            ));
            state.hub.emit_order_event(&session_id, &payload);
        }
        ClientMessage::ItemSelected {
            session_id,
            item_id,
            item_name,
            selected,
        } => {
            let data = serde_json::json!({
                "itemId": item_id,
                "itemName": item_name,
                "selected": selected,
            });
            log_ephemeral(state, &session_id, EventType::ItemSelected, &data).await;
            let payload = ServerMessage::CustomerEvent(CustomerEvent::item_selected(
                session_id.clone(),
                item_id,
                item_name,
                selected,
            ));
            state.hub.emit_order_event(&session_id, &payload);
        }
        ClientMessage::CustomerTyping {
            session_id,
            is_typing,
        } => {
            // Typing indicators are never persisted
            let payload =
                ServerMessage::CustomerEvent(CustomerEvent::typing(session_id.clone(), is_typing));
            state.hub.emit_order_event(&session_id, &payload);
        }
        ClientMessage::UpdateOrderStatus {
            order_id,
            status,
            admin_notes,
        } => match state
            .orders
            .update_status(&order_id, status, admin_notes)
            .await
        {
            Ok(order) => {
                // Direct ack to the updating admin, in addition to the
                // room-wide broadcasts the service performed
                state.hub.send_to(
                    conn,
                    ServerMessage::OrderStatusUpdated {
                        order_id,
                        status,
                        order,
                    },
                );
            }
            Err(e) => {
                state.hub.send_to(
                    conn,
                    ServerMessage::Error {
                        message: e.client_message(),
                    },
                );
            }
        },
        ClientMessage::AdminMessage {
            session_id,
            message,
        } => {
            let data = serde_json::json!({ "message": message });
            log_ephemeral(state, &session_id, EventType::AdminMessage, &data).await;
            // Admin messages go to the session room only
            state.hub.emit_to_room(
                &Room::session(session_id),
                &ServerMessage::AdminEvent {
                    kind: AdminEventKind::AdminMessage,
                    message,
                    timestamp: Utc::now(),
                },
            );
        }
    }
}

async fn join_admin(state: &ServerState, conn: ConnId) {
    // Register first, then snapshot: anything landing in between is
    // queued behind the snapshot on the same channel
    state.registry.join(conn, Room::Admin);
    state.registry.set_role(conn, UserRole::Admin);
    tracing::info!(conn, "joined as admin");

    state.hub.send_to(
        conn,
        ServerMessage::JoinedAdmin {
            user_type: UserRole::Admin,
        },
    );

    let snapshot = match snapshot::for_admin(&state.pool).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(conn, "Failed to build admin snapshot: {e}");
            ServerMessage::InitialOrders { orders: vec![] }
        }
    };
    state.hub.send_to(conn, snapshot);
}

async fn join_session(state: &ServerState, conn: ConnId, session_id: String, role: UserRole) {
    if session_id.is_empty() {
        state.hub.send_to(
            conn,
            ServerMessage::Error {
                message: "Session ID is required".into(),
            },
        );
        return;
    }

    state.registry.join(conn, Room::session(session_id.clone()));
    state.registry.set_role(conn, role);
    tracing::info!(conn, session_id = %session_id, role = ?role, "joined session");

    state.hub.send_to(
        conn,
        ServerMessage::JoinedSession {
            session_id: session_id.clone(),
            user_type: role,
        },
    );

    // Plain customers get no snapshot: only events from this point
    // forward are visible to them
    if role == UserRole::Admin {
        let snapshot = match snapshot::for_session_admin(&state.pool, &session_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(conn, "Failed to build session snapshot: {e}");
                ServerMessage::InitialOrders { orders: vec![] }
            }
        };
        state.hub.send_to(conn, snapshot);
    }
}

/// Best-effort event-log append: failures are logged, never surfaced
async fn log_ephemeral(
    state: &ServerState,
    session_id: &str,
    event_type: EventType,
    data: &serde_json::Value,
) {
    if let Err(e) = event::append(
        &state.pool,
        session_id,
        event_type,
        None,
        data,
        Utc::now(),
    )
    .await
    {
        tracing::error!(session_id, ?event_type, "Failed to record event: {e}");
    }
}
