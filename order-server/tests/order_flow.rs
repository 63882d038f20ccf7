//! End-to-end lifecycle tests against an in-memory database
//!
//! Broadcast assertions use real registered connections: a receiver
//! joined to a room observes exactly what a WebSocket client would.

use chrono::Utc;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::error::TryRecvError;

use order_server::db::repository::{event, order, session};
use order_server::service::CreateOrder;
use order_server::ws::snapshot;
use order_server::{Config, DbService, Room, ServerState, StatusPolicy};
use shared::message::ServerMessage;
use shared::models::{OrderItemInput, OrderStatus, Session};

async fn state() -> ServerState {
    state_with(Config::default()).await
}

async fn state_with(config: Config) -> ServerState {
    let db = DbService::in_memory().await.expect("in-memory database");
    ServerState::with_pool(config, db.pool)
}

async fn seed_session(state: &ServerState) -> String {
    let now = Utc::now();
    let record = Session {
        session_id: uuid::Uuid::new_v4().to_string(),
        name: "Table 7".into(),
        table_number: Some("7".into()),
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

fn subscribe(state: &ServerState, room: Room) -> Receiver<ServerMessage> {
    let (conn, rx) = state.registry.connect();
    state.registry.join(conn, room);
    rx
}

fn item(name: &str, quantity: Option<i64>, price: Option<f64>) -> OrderItemInput {
    OrderItemInput {
        item_name: name.into(),
        quantity,
        price,
        notes: None,
    }
}

fn place(session_id: &str, items: Vec<OrderItemInput>) -> CreateOrder {
    CreateOrder {
        session_id: session_id.into(),
        items,
        customer_notes: None,
        idempotency_key: None,
    }
}

#[tokio::test]
async fn file_backed_database_opens_and_migrates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("orders.db");
    let db = DbService::new(path.to_str().expect("utf8 path"))
        .await
        .expect("open file database");

    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
         ('sessions', 'orders', 'order_items', 'events', 'menu')",
    )
    .fetch_one(&db.pool)
    .await
    .expect("schema query");
    assert_eq!(tables, 5);
}

#[tokio::test]
async fn create_order_computes_total_and_defaults() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let order = state
        .orders
        .create_order(place(
            &session_id,
            vec![
                item("Burger", Some(2), Some(12.99)),
                // no price, no quantity
                item("Water", None, None),
            ],
        ))
        .await
        .expect("create order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert!((order.total_amount - 25.98).abs() < 1e-9);
    assert_eq!(order.items[1].quantity, 1);
    assert_eq!(order.items[1].price, 0.0);
}

#[tokio::test]
async fn create_order_broadcasts_identically_to_both_rooms() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let mut session_rx = subscribe(&state, Room::session(session_id.clone()));
    let mut admin_rx = subscribe(&state, Room::Admin);

    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    let to_session = session_rx.try_recv().expect("session room message");
    let to_admin = admin_rx.try_recv().expect("admin room message");

    match (&to_session, &to_admin) {
        (ServerMessage::NewOrder { order: a }, ServerMessage::NewOrder { order: b }) => {
            assert_eq!(a.order_id, order.order_id);
            assert_eq!(b.order_id, order.order_id);
        }
        other => panic!("unexpected messages: {other:?}"),
    }
    // Byte-identical payloads on the wire
    assert_eq!(
        serde_json::to_string(&to_session).unwrap(),
        serde_json::to_string(&to_admin).unwrap()
    );
}

#[tokio::test]
async fn rejected_creations_emit_nothing() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let mut admin_rx = subscribe(&state, Room::Admin);

    let empty = state.orders.create_order(place(&session_id, vec![])).await;
    assert!(matches!(empty, Err(order_server::AppError::Validation(_))));

    let bad_session = state
        .orders
        .create_order(place("no-such-session", vec![item("Tea", None, None)]))
        .await;
    assert!(matches!(
        bad_session,
        Err(order_server::AppError::NotFound(_))
    ));

    assert_eq!(admin_rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn create_order_appends_one_placed_event() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Burger", Some(2), Some(12.99))]))
        .await
        .expect("create order");

    let events = event::find_by_session(&state.pool, &session_id, 100)
        .await
        .expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].order_id.as_deref(), Some(order.order_id.as_str()));
    assert_eq!(events[0].data["totalAmount"], serde_json::json!(25.98));
}

#[tokio::test]
async fn duplicate_idempotency_key_returns_existing_order_silently() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let mut admin_rx = subscribe(&state, Room::Admin);

    let request = CreateOrder {
        session_id: session_id.clone(),
        items: vec![item("Burger", Some(1), Some(9.99))],
        customer_notes: None,
        idempotency_key: Some("retry-abc".into()),
    };

    let first = state
        .orders
        .create_order(request.clone())
        .await
        .expect("first attempt");
    let second = state
        .orders
        .create_order(request)
        .await
        .expect("second attempt");

    assert_eq!(first.order_id, second.order_id);

    let stored = order::find_by_session(&state.pool, &session_id)
        .await
        .expect("orders");
    assert_eq!(stored.len(), 1);

    // Exactly one broadcast for the two attempts
    assert!(matches!(
        admin_rx.try_recv(),
        Ok(ServerMessage::NewOrder { .. })
    ));
    assert_eq!(admin_rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn status_update_reaches_both_rooms_with_notes() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Burger", Some(2), Some(12.99))]))
        .await
        .expect("create order");

    let mut session_rx = subscribe(&state, Room::session(session_id.clone()));
    let mut admin_rx = subscribe(&state, Room::Admin);

    let updated = state
        .orders
        .update_status(
            &order.order_id,
            OrderStatus::Ready,
            Some("Extra sauce on the side".into()),
        )
        .await
        .expect("update status");

    assert_eq!(updated.status, OrderStatus::Ready);
    assert_eq!(updated.admin_notes, "Extra sauce on the side");

    match session_rx.try_recv().expect("session room message") {
        ServerMessage::StatusUpdated {
            order_id,
            status,
            admin_notes,
            order,
        } => {
            assert_eq!(order_id, updated.order_id);
            assert_eq!(status, OrderStatus::Ready);
            assert_eq!(admin_notes.as_deref(), Some("Extra sauce on the side"));
            assert_eq!(order.admin_notes, "Extra sauce on the side");
        }
        other => panic!("unexpected message: {other:?}"),
    }
    match admin_rx.try_recv().expect("admin room message") {
        ServerMessage::OrderStatusUpdated { order_id, status, .. } => {
            assert_eq!(order_id, updated.order_id);
            assert_eq!(status, OrderStatus::Ready);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn omitted_admin_notes_keep_their_stored_value() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    state
        .orders
        .update_status(&order.order_id, OrderStatus::Accepted, Some("No ice".into()))
        .await
        .expect("first update");
    let updated = state
        .orders
        .update_status(&order.order_id, OrderStatus::Preparing, None)
        .await
        .expect("second update");

    assert_eq!(updated.admin_notes, "No ice");
}

#[tokio::test]
async fn updating_a_missing_order_is_not_found_and_silent() {
    let state = state().await;
    seed_session(&state).await;
    let mut admin_rx = subscribe(&state, Room::Admin);

    let result = state
        .orders
        .update_status("no-such-order", OrderStatus::Ready, None)
        .await;

    assert!(matches!(result, Err(order_server::AppError::NotFound(_))));
    assert_eq!(admin_rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn permissive_policy_allows_reopening_terminal_orders() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    state
        .orders
        .update_status(&order.order_id, OrderStatus::Completed, None)
        .await
        .expect("complete");
    let reopened = state
        .orders
        .update_status(&order.order_id, OrderStatus::Pending, None)
        .await
        .expect("reopen");
    assert_eq!(reopened.status, OrderStatus::Pending);
}

#[tokio::test]
async fn forward_only_policy_rejects_skipped_transitions() {
    let config = Config {
        status_policy: StatusPolicy::ForwardOnly,
        ..Config::default()
    };
    let state = state_with(config).await;
    let session_id = seed_session(&state).await;
    let order = state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    // pending -> ready skips accepted/preparing
    let skipped = state
        .orders
        .update_status(&order.order_id, OrderStatus::Ready, None)
        .await;
    assert!(matches!(skipped, Err(order_server::AppError::Validation(_))));

    let untouched = order::find_by_id(&state.pool, &order.order_id)
        .await
        .expect("read")
        .expect("order");
    assert_eq!(untouched.status, OrderStatus::Pending);

    let accepted = state
        .orders
        .update_status(&order.order_id, OrderStatus::Accepted, None)
        .await
        .expect("legal transition");
    assert_eq!(accepted.status, OrderStatus::Accepted);

    // Cancellation stays available from any non-terminal state
    let cancelled = state
        .orders
        .update_status(&order.order_id, OrderStatus::Cancelled, None)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Nothing may ever move back to pending
    let reopened = state
        .orders
        .update_status(&order.order_id, OrderStatus::Pending, None)
        .await;
    assert!(matches!(reopened, Err(order_server::AppError::Validation(_))));
}

#[tokio::test]
async fn session_delete_removes_orders_but_keeps_events() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    let removed = session::delete(&state.pool, &session_id, false)
        .await
        .expect("delete");
    assert!(removed);

    let orders = order::find_by_session(&state.pool, &session_id)
        .await
        .expect("orders");
    assert!(orders.is_empty());

    let surviving = event::count_by_session(&state.pool, &session_id)
        .await
        .expect("event count");
    assert_eq!(surviving, 1);
}

#[tokio::test]
async fn session_delete_with_cascade_removes_events_too() {
    let state = state().await;
    let session_id = seed_session(&state).await;
    state
        .orders
        .create_order(place(&session_id, vec![item("Tea", None, Some(2.50))]))
        .await
        .expect("create order");

    session::delete(&state.pool, &session_id, true)
        .await
        .expect("delete");

    let surviving = event::count_by_session(&state.pool, &session_id)
        .await
        .expect("event count");
    assert_eq!(surviving, 0);
}

#[tokio::test]
async fn admin_snapshot_caps_at_one_hundred_newest_first() {
    let state = state().await;
    let session_id = seed_session(&state).await;

    // Direct inserts with stepped timestamps keep the DESC order exact
    let base = Utc::now();
    for n in 0..105i64 {
        let created = base + chrono::Duration::seconds(n);
        sqlx::query(
            "INSERT INTO orders (order_id, session_id, status, total_amount, customer_notes, \
             admin_notes, created_at, updated_at) VALUES (?, ?, 'pending', 0, '', '', ?, ?)",
        )
        .bind(format!("order-{n:03}"))
        .bind(&session_id)
        .bind(created)
        .bind(created)
        .execute(&state.pool)
        .await
        .expect("insert order");
    }

    let ServerMessage::InitialOrders { orders } =
        snapshot::for_admin(&state.pool).await.expect("admin snapshot")
    else {
        panic!("expected initialOrders");
    };
    assert_eq!(orders.len(), 100);
    assert_eq!(orders[0].order_id, "order-104");
    assert_eq!(orders[99].order_id, "order-005");

    // The session-scoped view stays uncapped
    let scoped = order::find_by_session(&state.pool, &session_id)
        .await
        .expect("session list");
    assert_eq!(scoped.len(), 105);
}

#[tokio::test]
async fn snapshots_scope_by_audience() {
    let state = state().await;
    let session_a = seed_session(&state).await;
    let session_b = seed_session(&state).await;

    for (session, name) in [(&session_a, "First"), (&session_a, "Second"), (&session_b, "Third")] {
        state
            .orders
            .create_order(place(session, vec![item(name, None, Some(1.0))]))
            .await
            .expect("create order");
        // Distinct created_at values keep the DESC ordering stable
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let ServerMessage::InitialOrders { orders } =
        snapshot::for_admin(&state.pool).await.expect("admin snapshot")
    else {
        panic!("expected initialOrders");
    };
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].items[0].item_name, "Third");

    let ServerMessage::InitialOrders { orders } =
        snapshot::for_session_admin(&state.pool, &session_a)
            .await
            .expect("session snapshot")
    else {
        panic!("expected initialOrders");
    };
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.session_id == session_a));
    assert_eq!(orders[0].items[0].item_name, "Second");
}
