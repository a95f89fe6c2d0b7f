//! Reaction catalog, ranked list and default reaction scenarios
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use std::sync::Arc;

use chat_core::{KeyValueStore, ReactionListKind, ReactionType, RemoteError, MAX_RECENT_REACTIONS};
use chrono::{DateTime, Duration, Utc};
use chat_service::ServiceError;
use integration_tests::*;

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_reload_with_same_fingerprint_is_silent() {
    let harness = TestHarness::new();
    harness
        .remote
        .set_catalog(catalog(vec![definition("👍"), definition("❤")], 1));
    let manager = harness.reactions();

    manager.reload_reactions().await.unwrap();
    manager.flush().await.unwrap();
    assert_eq!(harness.sink.count("ACTIVE_REACTIONS"), 1);
    let writes = harness.writes();
    let calls = harness.remote.calls.catalog();

    manager.reload_reactions().await.unwrap();
    manager.flush().await.unwrap();
    assert_eq!(harness.remote.calls.catalog(), calls + 1);
    assert_eq!(harness.sink.count("ACTIVE_REACTIONS"), 1);
    assert_eq!(harness.writes(), writes);
}

#[tokio::test]
async fn test_is_active_reaction() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness.remote.set_catalog(catalog(
        vec![definition("👍"), definition("💤").inactive()],
        3,
    ));
    let manager = harness.reactions();

    // Nothing loaded yet
    assert!(!manager.is_active_reaction(&emoji("👍")).await.unwrap());

    harness.remote.gate.release();
    manager.reload_reactions().await.unwrap();
    assert!(manager.is_active_reaction(&emoji("👍")).await.unwrap());
    assert!(!manager.is_active_reaction(&emoji("💤")).await.unwrap());
    assert!(!manager.is_active_reaction(&emoji("🤷")).await.unwrap());
}

#[tokio::test]
async fn test_emoji_lookup_waits_for_first_catalog() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness.remote.set_catalog(catalog(vec![definition("👍")], 9));
    let manager = harness.reactions();

    let lookup = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.get_emoji_reaction("👍").await })
    };
    settle().await;
    assert!(!lookup.is_finished());

    harness.remote.gate.release();
    let definition = lookup.await.unwrap().unwrap();
    assert_eq!(definition.title, "Reaction 👍");

    let missing = manager.get_emoji_reaction("🤷").await.unwrap_err();
    assert!(missing.is_not_found());
    assert_eq!(missing.error_code(), "UNKNOWN_REACTION");
}

#[tokio::test]
async fn test_persisted_catalog_is_served_after_restart() {
    let store = Arc::new(chat_cache::MemoryStore::new());
    {
        let harness = TestHarness::with_store(store.clone());
        harness.remote.set_catalog(catalog(vec![definition("👍")], 4));
        let manager = harness.reactions();
        manager.reload_reactions().await.unwrap();
        manager.flush().await.unwrap();
        manager.shutdown().await.unwrap();
    }

    let harness = TestHarness::with_store(store);
    harness.remote.gate.hold();
    let manager = harness.reactions();

    assert!(manager.is_active_reaction(&emoji("👍")).await.unwrap());
    settle().await;
    assert_eq!(harness.remote.calls.catalog(), 0);

    let state = manager.get_current_state().await.unwrap();
    assert!(state
        .iter()
        .any(|update| update.event_type() == "ACTIVE_REACTIONS"));
}

#[tokio::test]
async fn test_concurrent_catalog_reloads_share_one_fetch() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness.remote.set_catalog(catalog(vec![definition("👍")], 2));
    let manager = harness.reactions();

    let reloads = spawn_many(4, || {
        let manager = manager.clone();
        async move { manager.reload_reactions().await }
    })
    .await;
    assert_eq!(harness.remote.calls.catalog(), 1);

    harness.remote.gate.release();
    for reload in reloads {
        reload.await.unwrap().unwrap();
    }
    assert_eq!(harness.remote.calls.catalog(), 1);
    assert_eq!(harness.sink.count("ACTIVE_REACTIONS"), 1);
}

#[tokio::test]
async fn test_confirmed_old_catalog_is_restamped() {
    let store = Arc::new(chat_cache::MemoryStore::new());
    {
        let harness = TestHarness::with_store(store.clone());
        harness.remote.set_catalog(catalog(vec![definition("👍")], 4));
        let manager = harness.reactions();
        manager.reload_reactions().await.unwrap();
        manager.flush().await.unwrap();
        manager.shutdown().await.unwrap();
    }

    let two_hours_ago = Utc::now() - Duration::hours(2);
    let mut record: serde_json::Value =
        serde_json::from_slice(&store.peek("reactions").unwrap()).unwrap();
    record["saved_at"] = serde_json::json!(two_hours_ago);
    store
        .set("reactions", serde_json::to_vec(&record).unwrap())
        .await
        .unwrap();

    let saved_at = |harness: &TestHarness| -> Option<DateTime<Utc>> {
        let record = harness.stored("reactions")?;
        serde_json::from_value(record["saved_at"].clone()).ok()
    };

    // Old copy: one reload at start, answered "not modified"
    {
        let harness = TestHarness::with_store(store.clone());
        harness.remote.set_catalog(catalog(vec![definition("👍")], 4));
        let manager = harness.reactions();
        eventually(|| saved_at(&harness).is_some_and(|at| at > two_hours_ago))
            .await
            .unwrap();
        assert_eq!(harness.remote.calls.catalog(), 1);
        assert_eq!(harness.sink.count("ACTIVE_REACTIONS"), 0);
        manager.shutdown().await.unwrap();
    }

    // Fresh copy: nothing to fetch
    let harness = TestHarness::with_store(store);
    let manager = harness.reactions();
    assert!(manager.is_active_reaction(&emoji("👍")).await.unwrap());
    settle().await;
    assert_eq!(harness.remote.calls.catalog(), 0);
}

#[tokio::test]
async fn test_available_reactions_list_each_reaction_once() {
    let harness = TestHarness::new();
    harness.remote.set_catalog(catalog(
        vec![definition("👍"), definition("❤"), definition("🔥")],
        5,
    ));
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["🔥", "👍"]));
    let manager = harness.reactions();
    manager.reload_reactions().await.unwrap();
    manager.get_reaction_list(ReactionListKind::Top).await.unwrap();

    let reactions = manager.get_available_reactions(8).await.unwrap();
    let order: Vec<ReactionType> = reactions
        .all()
        .map(|reaction| reaction.reaction_type.clone())
        .collect();
    assert_eq!(order, emojis(&["🔥", "👍", "❤"]));
    assert!(reactions.recent.is_empty());
    assert!(reactions.all().all(|reaction| !reaction.needs_premium));
}

// ============================================================================
// Ranked Lists
// ============================================================================

#[tokio::test]
async fn test_concurrent_list_reads_share_one_fetch() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["👍", "❤"]));
    let manager = harness.reactions();

    let readers = spawn_many(5, || {
        let manager = manager.clone();
        async move { manager.get_reaction_list(ReactionListKind::Top).await }
    })
    .await;
    assert_eq!(harness.remote.calls.lists(), 1);

    harness.remote.gate.release();
    for reader in readers {
        assert_eq!(reader.await.unwrap().unwrap(), emojis(&["👍", "❤"]));
    }
    assert_eq!(harness.remote.calls.lists(), 1);
    assert_eq!(harness.sink.count("REACTION_LIST"), 1);
}

#[tokio::test]
async fn test_late_joiner_gets_fetch_result() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["👍"]));
    let manager = harness.reactions();

    let first = spawn_many(1, || {
        let manager = manager.clone();
        async move { manager.get_reaction_list(ReactionListKind::Top).await }
    })
    .await;
    eventually(|| harness.remote.calls.lists() == 1).await.unwrap();

    // The server moves on while the first fetch is outstanding
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["❤", "👍"]));
    let late = spawn_many(1, || {
        let manager = manager.clone();
        async move { manager.get_reaction_list(ReactionListKind::Top).await }
    })
    .await;

    harness.remote.gate.release();
    let first = first.into_iter().next().unwrap().await.unwrap().unwrap();
    let late = late.into_iter().next().unwrap().await.unwrap().unwrap();
    assert_eq!(first, late);
    assert_eq!(harness.remote.calls.lists(), 1);
}

#[tokio::test]
async fn test_recent_list_is_capped_and_moves_to_front() {
    let harness = TestHarness::new();
    let manager = harness.reactions();

    for n in 0..MAX_RECENT_REACTIONS + 5 {
        manager
            .add_recent_reaction(ReactionType::custom_emoji(n as i64 + 1))
            .await
            .unwrap();
    }
    let recent = manager.get_reaction_list(ReactionListKind::Recent).await.unwrap();
    assert_eq!(recent.len(), MAX_RECENT_REACTIONS);
    assert_eq!(recent[0], ReactionType::custom_emoji(105));
    // The five oldest were evicted
    assert!(!recent.contains(&ReactionType::custom_emoji(5)));
    assert!(recent.contains(&ReactionType::custom_emoji(6)));

    manager
        .add_recent_reaction(ReactionType::custom_emoji(50))
        .await
        .unwrap();
    let recent = manager.get_reaction_list(ReactionListKind::Recent).await.unwrap();
    assert_eq!(recent.len(), MAX_RECENT_REACTIONS);
    assert_eq!(recent[0], ReactionType::custom_emoji(50));
    assert_eq!(recent[1], ReactionType::custom_emoji(105));

    manager.flush().await.unwrap();
    let stored = harness.stored("reaction_list_recent").unwrap();
    assert_eq!(stored["reactions"].as_array().unwrap().len(), MAX_RECENT_REACTIONS);
}

#[tokio::test]
async fn test_empty_recent_reaction_is_rejected() {
    let harness = TestHarness::new();
    let manager = harness.reactions();

    let err = manager
        .add_recent_reaction(ReactionType::emoji(""))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_unchanged_list_fingerprint_skips_write_and_notification() {
    let harness = TestHarness::new();
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["👍"]));
    let manager = harness.reactions();

    manager.get_reaction_list(ReactionListKind::Top).await.unwrap();
    manager.flush().await.unwrap();
    let writes = harness.writes();
    let notifications = harness.sink.count("REACTION_LIST");
    assert_eq!(notifications, 1);

    let list = manager
        .reload_reaction_list(ReactionListKind::Top)
        .await
        .unwrap();
    manager.flush().await.unwrap();
    assert_eq!(list, emojis(&["👍"]));
    assert_eq!(harness.remote.calls.lists(), 2);
    assert_eq!(harness.writes(), writes);
    assert_eq!(harness.sink.count("REACTION_LIST"), notifications);
}

#[tokio::test]
async fn test_clear_list_is_optimistic() {
    let harness = TestHarness::new();
    harness
        .remote
        .set_list(ReactionListKind::Top, list_snapshot(&["👍", "❤"]));
    let manager = harness.reactions();
    manager.get_reaction_list(ReactionListKind::Top).await.unwrap();

    harness
        .remote
        .set_failure(Some(RemoteError::new(500, "INTERNAL")));
    let err = manager
        .clear_reaction_list(ReactionListKind::Top)
        .await
        .unwrap_err();
    assert_eq!(err.remote().map(|e| e.code), Some(500));
    assert_eq!(harness.remote.calls.clears(), 1);

    // Cleared locally even though the remote refused
    harness.remote.set_failure(None);
    let list = manager.get_reaction_list(ReactionListKind::Top).await.unwrap();
    assert!(list.is_empty());
    assert_eq!(harness.sink.count("REACTION_LIST"), 2);

    manager.flush().await.unwrap();
    let stored = harness.stored("reaction_list_top").unwrap();
    assert!(stored["reactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_fetch_failure_reaches_every_waiter() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    harness
        .remote
        .set_failure(Some(RemoteError::new(420, "FLOOD_WAIT")));
    let manager = harness.reactions();

    let readers = spawn_many(3, || {
        let manager = manager.clone();
        async move { manager.get_reaction_list(ReactionListKind::DefaultTag).await }
    })
    .await;
    harness.remote.gate.release();

    for reader in readers {
        let err = reader.await.unwrap().unwrap_err();
        assert_eq!(err.remote().map(|e| e.code), Some(420));
    }
    assert_eq!(harness.remote.calls.lists(), 1);
}

// ============================================================================
// Default Reaction
// ============================================================================

#[tokio::test]
async fn test_default_reaction_requires_active_reaction() {
    let harness = TestHarness::new();
    harness.remote.set_catalog(catalog(vec![definition("👍")], 2));
    let manager = harness.reactions();
    manager.reload_reactions().await.unwrap();

    let err = manager
        .set_default_reaction(emoji("🤷"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "REACTION_UNAVAILABLE");

    let err = manager
        .set_default_reaction(ReactionType::custom_emoji(77))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(harness.remote.calls.default_reaction(), 0);

    manager.set_default_reaction(emoji("👍")).await.unwrap();
    assert_eq!(manager.get_default_reaction().await.unwrap(), Some(emoji("👍")));
    assert_eq!(harness.sink.count("DEFAULT_REACTION"), 1);

    // Setting the current value again is a no-op
    manager.set_default_reaction(emoji("👍")).await.unwrap();
    assert_eq!(harness.remote.calls.default_reaction(), 1);

    harness.directory.set_premium(true);
    manager
        .set_default_reaction(ReactionType::custom_emoji(77))
        .await
        .unwrap();
    assert_eq!(harness.remote.calls.default_reaction(), 2);
}

#[tokio::test]
async fn test_premium_reaction_as_default_needs_premium_account() {
    let harness = TestHarness::new();
    harness
        .remote
        .set_catalog(catalog(vec![definition("👍"), definition("🐳").premium()], 5));
    let manager = harness.reactions();
    manager.reload_reactions().await.unwrap();

    let err = manager
        .set_default_reaction(emoji("🐳"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "REACTION_UNAVAILABLE");
    assert_eq!(manager.get_default_reaction().await.unwrap(), None);
    assert_eq!(harness.remote.calls.default_reaction(), 0);

    harness.directory.set_premium(true);
    manager.set_default_reaction(emoji("🐳")).await.unwrap();
    assert_eq!(manager.get_default_reaction().await.unwrap(), Some(emoji("🐳")));
    assert_eq!(harness.remote.calls.default_reaction(), 1);
}

#[tokio::test]
async fn test_default_reaction_is_kept_when_remote_fails() {
    let harness = TestHarness::new();
    harness.remote.set_catalog(catalog(vec![definition("❤")], 2));
    let manager = harness.reactions();
    manager.reload_reactions().await.unwrap();

    harness
        .remote
        .set_failure(Some(RemoteError::new(400, "REACTION_INVALID")));
    assert!(manager.set_default_reaction(emoji("❤")).await.is_err());
    assert_eq!(manager.get_default_reaction().await.unwrap(), Some(emoji("❤")));

    manager.flush().await.unwrap();
    assert!(harness.stored("default_reaction").is_some());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_shutdown_aborts_waiters() {
    let harness = TestHarness::new();
    harness.remote.gate.hold();
    let manager = harness.reactions();

    let readers = spawn_many(2, || {
        let manager = manager.clone();
        async move { manager.get_reaction_list(ReactionListKind::Top).await }
    })
    .await;
    let lookup = spawn_many(1, || {
        let manager = manager.clone();
        async move { manager.get_emoji_reaction("👍").await }
    })
    .await;

    manager.shutdown().await.unwrap();
    for reader in readers {
        let err = reader.await.unwrap().unwrap_err();
        assert_eq!(err.error_code(), "REQUEST_ABORTED");
    }
    for lookup in lookup {
        let err = lookup.await.unwrap().unwrap_err();
        assert!(err.remote().is_some_and(RemoteError::is_aborted));
    }

    harness.remote.gate.release();
    assert!(matches!(
        manager.get_default_reaction().await,
        Err(ServiceError::Shutdown)
    ));
}
