//! Test helpers
//!
//! Wires the fakes into a [`ServiceContext`] and provides polling and
//! store inspection utilities.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chat_cache::MemoryStore;
use chat_common::{init_tracing, ClientConfig, ReactionSettings, TracingConfig};
use chat_core::ConversationKind;
use chat_service::{
    ClientState, Collaborators, ReactionManager, ServiceContext, ServiceContextBuilder,
    ServiceResult, SponsoredManager,
};
use serde_json::Value;

use crate::fakes::{FakeDirectory, FakeReactionRemote, FakeSponsoredRemote, PlainTextParser, RecordingSink};
use crate::fixtures::{BROADCAST, GROUP, SAVED_FROM, SPONSOR};

/// All fakes of one test, shared with the managers built from them
pub struct TestHarness {
    pub remote: Arc<FakeReactionRemote>,
    pub sponsored: Arc<FakeSponsoredRemote>,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub directory: Arc<FakeDirectory>,
    pub settings: ReactionSettings,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Harness over an existing store, as after a restart
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let _ = init_tracing(&TracingConfig::for_tests());

        let directory = Arc::new(FakeDirectory::new());
        directory.add(BROADCAST, ConversationKind::Broadcast);
        directory.add(GROUP, ConversationKind::Group);
        directory.add(SPONSOR, ConversationKind::Channel);
        directory.add(SAVED_FROM, ConversationKind::Private);

        Self {
            remote: Arc::new(FakeReactionRemote::new()),
            sponsored: Arc::new(FakeSponsoredRemote::new()),
            store,
            sink: Arc::new(RecordingSink::new()),
            directory,
            settings: ReactionSettings::default(),
        }
    }

    pub fn context(&self) -> ServiceContext {
        ServiceContextBuilder::new()
            .reaction_remote(self.remote.clone())
            .sponsored_remote(self.sponsored.clone())
            .store(self.store.clone())
            .notifier(self.sink.clone())
            .directory(self.directory.clone())
            .content_parser(Arc::new(PlainTextParser))
            .settings(self.settings.clone())
            .build()
            .expect("every collaborator is set")
    }

    pub fn reactions(&self) -> ReactionManager {
        ReactionManager::spawn(self.context())
    }

    pub fn sponsored_manager(&self) -> SponsoredManager {
        SponsoredManager::spawn(self.context())
    }

    /// Start a full client state over the fakes; updates go to the publisher, not the sink
    pub fn client_state(&self, config: ClientConfig) -> ServiceResult<ClientState> {
        ClientState::start(
            config,
            Collaborators {
                reaction_remote: self.remote.clone(),
                sponsored_remote: self.sponsored.clone(),
                store: self.store.clone(),
                directory: self.directory.clone(),
                content_parser: Arc::new(PlainTextParser),
            },
        )
    }

    /// Persisted record under `key` as JSON
    pub fn stored(&self, key: &str) -> Option<Value> {
        let bytes = self.store.peek(key)?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn writes(&self) -> u64 {
        self.store.stats().writes
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll `condition` until it holds, failing after two seconds
pub async fn eventually<F>(mut condition: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    for _ in 0..400 {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    bail!("condition not met within 2s")
}

/// Spawn `count` copies of a request, giving each a chance to be queued
pub async fn spawn_many<F, Fut, T>(count: usize, mut make: F) -> Vec<tokio::task::JoinHandle<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles = (0..count).map(|_| tokio::spawn(make())).collect();
    settle().await;
    handles
}

/// Let spawned tasks and actors run until they are idle
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
