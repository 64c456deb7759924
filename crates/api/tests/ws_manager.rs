//! Unit tests for `WsManager`.
//!
//! These tests exercise the WebSocket connection manager directly, without
//! performing any HTTP upgrades. They verify add/remove semantics, per-user
//! delivery, conversation scoping, and graceful shutdown behaviour.

use axum::extract::ws::Message;
use tutorlink_api::ws::WsManager;

// ---------------------------------------------------------------------------
// Test: new manager starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: add() increments the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_increments_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), 1).await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: remove() decrements the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_decrements_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: remove() with unknown ID is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), 1).await;
    manager.remove("nonexistent").await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: send_to_user() reaches every session of that user only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_user_hits_all_of_that_users_sessions() {
    let manager = WsManager::new();

    let mut rx_a1 = manager.add("conn-a1".to_string(), 1).await;
    let mut rx_a2 = manager.add("conn-a2".to_string(), 1).await;
    let mut rx_b = manager.add("conn-b".to_string(), 2).await;

    let sent = manager
        .send_to_user(1, Message::Text("for user one".into()))
        .await;
    assert_eq!(sent, 2);

    let msg1 = rx_a1.recv().await.expect("first session should receive");
    let msg2 = rx_a2.recv().await.expect("second session should receive");
    assert!(matches!(&msg1, Message::Text(t) if *t == "for user one"));
    assert!(matches!(&msg2, Message::Text(t) if *t == "for user one"));

    // The other user must not have been delivered anything.
    assert!(rx_b.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: send_scoped() respects conversation subscriptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_scoped_filters_by_counterpart() {
    let manager = WsManager::new();

    let mut rx_thread = manager.add("conn-thread".to_string(), 1).await;
    let mut rx_firehose = manager.add("conn-firehose".to_string(), 1).await;

    assert!(manager.set_counterpart("conn-thread", Some(7)).await);

    // Event for the thread the scoped session is viewing: both receive.
    let sent = manager
        .send_scoped(1, Some(7), Message::Text("thread 7".into()))
        .await;
    assert_eq!(sent, 2);
    assert!(rx_thread.try_recv().is_ok());
    assert!(rx_firehose.try_recv().is_ok());

    // Event for another thread: only the unscoped session receives.
    let sent = manager
        .send_scoped(1, Some(8), Message::Text("thread 8".into()))
        .await;
    assert_eq!(sent, 1);
    assert!(rx_thread.try_recv().is_err());
    assert!(rx_firehose.try_recv().is_ok());

    // Unscoped event: both receive.
    let sent = manager
        .send_scoped(1, None, Message::Text("global".into()))
        .await;
    assert_eq!(sent, 2);
}

// ---------------------------------------------------------------------------
// Test: set_counterpart() on an unknown connection reports failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_counterpart_unknown_connection_returns_false() {
    let manager = WsManager::new();

    assert!(!manager.set_counterpart("ghost", Some(1)).await);
}

// ---------------------------------------------------------------------------
// Test: get_by_user() lists only that user's connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_user_filters_connections() {
    let manager = WsManager::new();

    let _rx1 = manager.add("conn-1".to_string(), 1).await;
    let _rx2 = manager.add("conn-2".to_string(), 2).await;
    let _rx3 = manager.add("conn-3".to_string(), 1).await;

    let mut ids = manager.get_by_user(1).await;
    ids.sort();
    assert_eq!(ids, vec!["conn-1".to_string(), "conn-3".to_string()]);
    assert!(manager.get_by_user(99).await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears all connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 2).await;
    assert_eq!(manager.connection_count().await, 2);

    manager.shutdown_all().await;

    // Connection count should be zero after shutdown.
    assert_eq!(manager.connection_count().await, 0);

    // Both receivers should have received a Close message.
    let msg1 = rx1.recv().await.expect("rx1 should receive Close");
    assert!(
        matches!(msg1, Message::Close(None)),
        "Expected Close(None), got: {msg1:?}"
    );

    let msg2 = rx2.recv().await.expect("rx2 should receive Close");
    assert!(
        matches!(msg2, Message::Close(None)),
        "Expected Close(None), got: {msg2:?}"
    );

    // After Close, the channel should be closed (no more messages).
    assert!(
        rx1.recv().await.is_none(),
        "Channel should be closed after shutdown"
    );
}

// ---------------------------------------------------------------------------
// Test: delivery skips closed channels without panicking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_skips_closed_channels() {
    let manager = WsManager::new();

    let rx1 = manager.add("conn-1".to_string(), 1).await;
    let mut rx2 = manager.add("conn-2".to_string(), 1).await;

    // Drop rx1 to close its channel.
    drop(rx1);

    // Delivery should not panic even though conn-1's channel is closed.
    let _ = manager
        .send_to_user(1, Message::Text("still alive".into()))
        .await;

    // conn-2 should still receive the message.
    let msg = rx2.recv().await.expect("rx2 should receive the message");
    assert!(matches!(&msg, Message::Text(t) if *t == "still alive"));
}

// ---------------------------------------------------------------------------
// Test: adding with duplicate ID replaces the previous connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_id_replaces_previous_connection() {
    let manager = WsManager::new();

    let _rx_old = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    // Re-add with the same ID -- should replace, not duplicate.
    let mut rx_new = manager.add("conn-1".to_string(), 1).await;
    assert_eq!(manager.connection_count().await, 1);

    // Send to verify the new receiver gets the message.
    manager
        .send_to_user(1, Message::Text("replaced".into()))
        .await;
    let msg = rx_new.recv().await.expect("New rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "replaced"));
}
