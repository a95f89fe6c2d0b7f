//! Client state
//!
//! Starts both managers over one set of collaborators and owns the update
//! publisher that observers subscribe to.

use std::sync::Arc;

use chat_cache::UpdatePublisher;
use chat_common::ClientConfig;
use chat_core::{
    ContentParser, ConversationDirectory, KeyValueStore, ReactionRemote, SponsoredRemote, Update,
};
use tokio::sync::broadcast;
use tracing::info;

use crate::services::{
    ReactionManager, ServiceContextBuilder, ServiceResult, SponsoredManager,
};

/// External collaborators supplied by the embedding client
pub struct Collaborators {
    pub reaction_remote: Arc<dyn ReactionRemote>,
    pub sponsored_remote: Arc<dyn SponsoredRemote>,
    pub store: Arc<dyn KeyValueStore>,
    pub directory: Arc<dyn ConversationDirectory>,
    pub content_parser: Arc<dyn ContentParser>,
}

/// Running managers plus the configuration they were started with
#[derive(Clone)]
pub struct ClientState {
    reactions: ReactionManager,
    sponsored: SponsoredManager,
    updates: UpdatePublisher,
    config: Arc<ClientConfig>,
}

impl ClientState {
    /// Spawn both managers on the current runtime
    pub fn start(config: ClientConfig, collaborators: Collaborators) -> ServiceResult<Self> {
        let updates = UpdatePublisher::new(config.notifications.buffer);
        let ctx = ServiceContextBuilder::new()
            .reaction_remote(collaborators.reaction_remote)
            .sponsored_remote(collaborators.sponsored_remote)
            .store(collaborators.store)
            .notifier(Arc::new(updates.clone()))
            .directory(collaborators.directory)
            .content_parser(collaborators.content_parser)
            .settings(config.reactions.clone())
            .build()?;

        info!(
            app = %config.app.name,
            env = ?config.app.env,
            recent_limit = config.reactions.recent_limit,
            "Starting reaction and sponsored content managers"
        );
        Ok(Self {
            reactions: ReactionManager::spawn(ctx.clone()),
            sponsored: SponsoredManager::spawn(ctx),
            updates,
            config: Arc::new(config),
        })
    }

    pub fn reactions(&self) -> &ReactionManager {
        &self.reactions
    }

    pub fn sponsored(&self) -> &SponsoredManager {
        &self.sponsored
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Receive every update published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Update> {
        self.updates.subscribe()
    }

    /// Write out pending records, then stop both managers
    pub async fn shutdown(&self) -> ServiceResult<()> {
        self.reactions.flush().await?;
        self.reactions.shutdown().await?;
        self.sponsored.shutdown().await?;
        info!("Client state shut down");
        Ok(())
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("reactions", &self.reactions)
            .field("sponsored", &self.sponsored)
            .field("subscribers", &self.updates.subscriber_count())
            .finish()
    }
}
