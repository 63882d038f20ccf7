//! WebSocket dispatch tests
//!
//! Drives the frame dispatcher directly with raw JSON text, asserting
//! on what lands in each connection's outbound channel.

use chrono::Utc;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::error::TryRecvError;

use order_server::db::repository::{event, session};
use order_server::ws::connection::dispatch;
use order_server::ws::registry::ConnId;
use order_server::{Config, DbService, Room, ServerState};
use shared::message::{CustomerEventKind, ServerMessage, UserRole};
use shared::models::{OrderStatus, Session};

async fn state() -> ServerState {
    let db = DbService::in_memory().await.expect("in-memory database");
    ServerState::with_pool(Config::default(), db.pool)
}

async fn seed_session(state: &ServerState) -> String {
    let now = Utc::now();
    let record = Session {
        session_id: uuid::Uuid::new_v4().to_string(),
        name: "Table 3".into(),
        table_number: None,
        is_active: true,
        customer_url: None,
        created_at: now,
        updated_at: now,
    };
    session::create(&state.pool, &record)
        .await
        .expect("seed session");
    record.session_id
}

fn connect(state: &ServerState) -> (ConnId, Receiver<ServerMessage>) {
    state.registry.connect()
}

fn next(rx: &mut Receiver<ServerMessage>) -> ServerMessage {
    rx.try_recv().expect("expected a queued message")
}

#[tokio::test]
async fn join_admin_acks_then_snapshots() {
    let state = state().await;
    let (conn, mut rx) = connect(&state);

    dispatch(&state, conn, r#"{"type":"joinAdmin"}"#).await;

    assert!(matches!(
        next(&mut rx),
        ServerMessage::JoinedAdmin {
            user_type: UserRole::Admin
        }
    ));
    match next(&mut rx) {
        ServerMessage::InitialOrders { orders } => assert!(orders.is_empty()),
        other => panic!("unexpected message: {other:?}"),
    }
    assert_eq!(state.registry.members(&Room::Admin), vec![conn]);
    assert_eq!(state.registry.role(conn), Some(UserRole::Admin));
}

#[tokio::test]
async fn customer_join_gets_no_snapshot() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let (conn, mut rx) = connect(&state);

    let frame = format!(
        r#"{{"type":"joinSession","sessionId":"{session_id}","userType":"customer"}}"#
    );
    dispatch(&state, conn, &frame).await;

    match next(&mut rx) {
        ServerMessage::JoinedSession {
            session_id: sid,
            user_type,
        } => {
            assert_eq!(sid, session_id);
            assert_eq!(user_type, UserRole::Customer);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    assert_eq!(state.registry.role(conn), Some(UserRole::Customer));
}

#[tokio::test]
async fn admin_session_join_gets_session_snapshot() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    // Place one order first so the snapshot has content
    let (customer, mut customer_rx) = connect(&state);
    let order_frame = format!(
        r#"{{"type":"orderPlaced","sessionId":"{session_id}","items":[{{"itemName":"Burger","quantity":2,"price":12.99}}]}}"#
    );
    dispatch(&state, customer, &order_frame).await;
    match next(&mut customer_rx) {
        ServerMessage::OrderConfirmed { order, .. } => {
            assert!((order.total_amount - 25.98).abs() < 1e-9);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let (admin, mut admin_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"joinSession","sessionId":"{session_id}","userType":"admin"}}"#
    );
    dispatch(&state, admin, &frame).await;

    assert!(matches!(next(&mut admin_rx), ServerMessage::JoinedSession { .. }));
    match next(&mut admin_rx) {
        ServerMessage::InitialOrders { orders } => {
            assert_eq!(orders.len(), 1);
            assert_eq!(orders[0].session_id, session_id);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn empty_session_id_is_rejected() {
    let state = state().await;
    let (conn, mut rx) = connect(&state);

    dispatch(
        &state,
        conn,
        r#"{"type":"joinSession","sessionId":"","userType":"customer"}"#,
    )
    .await;

    match next(&mut rx) {
        ServerMessage::Error { message } => assert_eq!(message, "Session ID is required"),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_frame_answers_with_error() {
    let state = state().await;
    let (conn, mut rx) = connect(&state);

    dispatch(&state, conn, r#"{"type":"launchMissiles"}"#).await;

    match next(&mut rx) {
        ServerMessage::Error { message } => assert!(message.starts_with("Invalid message")),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn order_placed_confirms_sender_and_notifies_admin_room() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let (admin, mut admin_rx) = connect(&state);
    state.registry.join(admin, Room::Admin);

    let (customer, mut customer_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"orderPlaced","sessionId":"{session_id}","items":[{{"itemName":"Tea"}}],"customerNotes":"no sugar"}}"#
    );
    dispatch(&state, customer, &frame).await;

    match next(&mut customer_rx) {
        ServerMessage::OrderConfirmed { order, .. } => {
            assert_eq!(order.customer_notes, "no sugar");
            assert_eq!(order.status, OrderStatus::Pending);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(matches!(next(&mut admin_rx), ServerMessage::NewOrder { .. }));
}

#[tokio::test]
async fn order_placed_for_unknown_session_yields_error_frame() {
    let state = state().await;
    let (conn, mut rx) = connect(&state);

    dispatch(
        &state,
        conn,
        r#"{"type":"orderPlaced","sessionId":"ghost","items":[{"itemName":"Tea"}]}"#,
    )
    .await;

    match next(&mut rx) {
        ServerMessage::Error { message } => {
            assert_eq!(message, "Failed to place order: Session not found");
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn update_order_status_acks_the_admin_directly() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let (customer, mut customer_rx) = connect(&state);
    let order_frame = format!(
        r#"{{"type":"orderPlaced","sessionId":"{session_id}","items":[{{"itemName":"Tea"}}]}}"#
    );
    dispatch(&state, customer, &order_frame).await;
    let ServerMessage::OrderConfirmed { order_id, .. } = next(&mut customer_rx) else {
        panic!("expected orderConfirmed");
    };

    let (admin, mut admin_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"updateOrderStatus","orderId":"{order_id}","status":"accepted"}}"#
    );
    dispatch(&state, admin, &frame).await;

    match next(&mut admin_rx) {
        ServerMessage::OrderStatusUpdated {
            order_id: oid,
            status,
            ..
        } => {
            assert_eq!(oid, order_id);
            assert_eq!(status, OrderStatus::Accepted);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn button_click_is_persisted_and_fanned_out() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let (admin, mut admin_rx) = connect(&state);
    state.registry.join(admin, Room::Admin);

    let (customer, _customer_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"buttonClicked","sessionId":"{session_id}","buttonId":"call-waiter","buttonLabel":"Call Waiter"}}"#
    );
    dispatch(&state, customer, &frame).await;

    match next(&mut admin_rx) {
        ServerMessage::CustomerEvent(event) => {
            assert_eq!(event.kind, CustomerEventKind::ButtonClicked);
            assert_eq!(event.session_id, session_id);
            assert_eq!(event.button_id.as_deref(), Some("call-waiter"));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let logged = event::count_by_session(&state.pool, &session_id)
        .await
        .expect("event count");
    assert_eq!(logged, 1);
}

#[tokio::test]
async fn typing_indicator_is_broadcast_but_never_persisted() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let (admin, mut admin_rx) = connect(&state);
    state.registry.join(admin, Room::Admin);

    let (customer, _customer_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"customerTyping","sessionId":"{session_id}","isTyping":true}}"#
    );
    dispatch(&state, customer, &frame).await;

    match next(&mut admin_rx) {
        ServerMessage::CustomerEvent(event) => {
            assert_eq!(event.kind, CustomerEventKind::CustomerTyping);
            assert_eq!(event.is_typing, Some(true));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let logged = event::count_by_session(&state.pool, &session_id)
        .await
        .expect("event count");
    assert_eq!(logged, 0);
}

#[tokio::test]
async fn admin_message_goes_to_the_session_room_only() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let (watcher, mut watcher_rx) = connect(&state);
    state.registry.join(watcher, Room::Admin);

    let (customer, mut customer_rx) = connect(&state);
    state
        .registry
        .join(customer, Room::session(session_id.clone()));

    let (admin, _admin_rx) = connect(&state);
    let frame = format!(
        r#"{{"type":"adminMessage","sessionId":"{session_id}","message":"Kitchen closes in 10"}}"#
    );
    dispatch(&state, admin, &frame).await;

    match next(&mut customer_rx) {
        ServerMessage::AdminEvent { message, .. } => {
            assert_eq!(message, "Kitchen closes in 10");
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert_eq!(watcher_rx.try_recv().unwrap_err(), TryRecvError::Empty);
}
