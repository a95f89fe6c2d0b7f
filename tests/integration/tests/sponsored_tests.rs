//! Sponsored content scenarios
//!
//! Run with: cargo test -p integration-tests --test sponsored_tests

use chat_core::{ConversationId, RemoteError};
use chat_service::ServiceError;
use integration_tests::*;

fn ids(items: &[chat_core::SponsoredItem]) -> Vec<&str> {
    items.iter().map(|item| item.random_id.as_str()).collect()
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch_and_drop_expired() {
    let harness = TestHarness::new();
    harness.sponsored.gate.hold();
    harness.sponsored.set_items(
        BROADCAST,
        vec![
            sponsored_item("a", "Visit us"),
            expired_sponsored_item("b"),
            sponsored_item("c", "Join now"),
        ],
    );
    let manager = harness.sponsored_manager();

    let callers = spawn_many(2, || {
        let manager = manager.clone();
        async move { manager.get_sponsored_messages(BROADCAST).await }
    })
    .await;
    harness.sponsored.gate.release();

    for caller in callers {
        let messages = caller.await.unwrap().unwrap();
        assert_eq!(ids(&messages.items), ["a", "c"]);
    }
    assert_eq!(harness.sponsored.fetch_count(), 1);
}

#[tokio::test]
async fn test_invalid_items_are_dropped_individually() {
    let harness = TestHarness::new();
    let mut unknown_sponsor = sponsored_item("x", "Who am I");
    unknown_sponsor.sponsor = ConversationId::new(31_337);
    harness.sponsored.set_items(
        BROADCAST,
        vec![
            sponsored_item("", "No id"),
            unknown_sponsor,
            sponsored_item("y", &format!("Broken {UNPARSABLE}")),
            sponsored_item("z", "Fine"),
        ],
    );
    let manager = harness.sponsored_manager();

    let messages = manager.get_sponsored_messages(BROADCAST).await.unwrap();
    assert_eq!(ids(&messages.items), ["z"]);
    assert_eq!(messages.items[0].content.text, "Fine");
}

#[tokio::test]
async fn test_each_fetch_replaces_cached_items() {
    let harness = TestHarness::new();
    harness
        .sponsored
        .set_items(BROADCAST, vec![sponsored_item("a", "One")]);
    let manager = harness.sponsored_manager();

    assert!(manager.cached_items(BROADCAST).await.unwrap().is_empty());
    manager.get_sponsored_messages(BROADCAST).await.unwrap();
    assert_eq!(ids(&manager.cached_items(BROADCAST).await.unwrap()), ["a"]);

    harness
        .sponsored
        .set_items(BROADCAST, vec![sponsored_item("b", "Two")]);
    let messages = manager.get_sponsored_messages(BROADCAST).await.unwrap();
    assert_eq!(ids(&messages.items), ["b"]);
    assert_eq!(ids(&manager.cached_items(BROADCAST).await.unwrap()), ["b"]);
    assert_eq!(harness.sponsored.fetch_count(), 2);

    // Nothing about sponsored content is persisted
    assert_eq!(harness.writes(), 0);
}

#[tokio::test]
async fn test_ineligible_conversations() {
    let harness = TestHarness::new();
    let manager = harness.sponsored_manager();

    let messages = manager.get_sponsored_messages(GROUP).await.unwrap();
    assert!(messages.items.is_empty());

    let err = manager
        .get_sponsored_messages(ConversationId::new(404))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_CONVERSATION");
    assert_eq!(harness.sponsored.fetch_count(), 0);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_items() {
    let harness = TestHarness::new();
    harness
        .sponsored
        .set_items(BROADCAST, vec![sponsored_item("a", "One")]);
    let manager = harness.sponsored_manager();
    manager.get_sponsored_messages(BROADCAST).await.unwrap();

    harness
        .sponsored
        .set_failure(Some(RemoteError::new(500, "INTERNAL")));
    let err = manager.get_sponsored_messages(BROADCAST).await.unwrap_err();
    assert_eq!(err.remote().map(|e| e.code), Some(500));
    assert_eq!(ids(&manager.cached_items(BROADCAST).await.unwrap()), ["a"]);
}

#[tokio::test]
async fn test_acknowledge_view() {
    let harness = TestHarness::new();
    let manager = harness.sponsored_manager();

    let err = manager
        .acknowledge_view(ConversationId::new(404), "a")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_CONVERSATION");

    let err = manager.acknowledge_view(GROUP, "a").await.unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_SPONSORED_MESSAGE");
    let err = manager.acknowledge_view(BROADCAST, "").await.unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_SPONSORED_MESSAGE");
    assert_eq!(harness.sponsored.view_count(), 0);

    manager.acknowledge_view(BROADCAST, "a").await.unwrap();
    assert_eq!(harness.sponsored.view_count(), 1);

    harness
        .sponsored
        .set_failure(Some(RemoteError::new(400, "MESSAGE_ID_INVALID")));
    let err = manager.acknowledge_view(BROADCAST, "a").await.unwrap_err();
    assert_eq!(err.remote().map(|e| e.code), Some(400));
}

#[tokio::test]
async fn test_shutdown_aborts_pending_fetch() {
    let harness = TestHarness::new();
    harness.sponsored.gate.hold();
    let manager = harness.sponsored_manager();

    let callers = spawn_many(2, || {
        let manager = manager.clone();
        async move { manager.get_sponsored_messages(BROADCAST).await }
    })
    .await;

    manager.shutdown().await.unwrap();
    for caller in callers {
        let err = caller.await.unwrap().unwrap_err();
        assert_eq!(err.error_code(), "REQUEST_ABORTED");
    }

    harness.sponsored.gate.release();
    assert!(matches!(
        manager.get_sponsored_messages(BROADCAST).await,
        Err(ServiceError::Shutdown)
    ));
    assert!(matches!(
        manager.acknowledge_view(BROADCAST, "a").await,
        Err(ServiceError::Shutdown)
    ));
}
