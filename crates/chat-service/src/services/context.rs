//! Service context - dependency container for the managers
//!
//! Holds every external collaborator the cache engine talks to, plus the
//! reaction settings slice of the client configuration.

use std::sync::Arc;

use chat_common::ReactionSettings;
use chat_core::traits::{
    ContentParser, ConversationDirectory, KeyValueStore, NotificationSink, ReactionRemote,
    SponsoredRemote,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every collaborator is shared behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Remote authority
    reaction_remote: Arc<dyn ReactionRemote>,
    sponsored_remote: Arc<dyn SponsoredRemote>,

    // Local persistence
    store: Arc<dyn KeyValueStore>,

    // Observers
    notifier: Arc<dyn NotificationSink>,

    // Identity and content
    directory: Arc<dyn ConversationDirectory>,
    content_parser: Arc<dyn ContentParser>,

    settings: ReactionSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        reaction_remote: Arc<dyn ReactionRemote>,
        sponsored_remote: Arc<dyn SponsoredRemote>,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationSink>,
        directory: Arc<dyn ConversationDirectory>,
        content_parser: Arc<dyn ContentParser>,
        settings: ReactionSettings,
    ) -> Self {
        Self {
            reaction_remote,
            sponsored_remote,
            store,
            notifier,
            directory,
            content_parser,
            settings,
        }
    }

    // === Remote ===

    pub fn reaction_remote(&self) -> &Arc<dyn ReactionRemote> {
        &self.reaction_remote
    }

    pub fn sponsored_remote(&self) -> &Arc<dyn SponsoredRemote> {
        &self.sponsored_remote
    }

    // === Persistence ===

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // === Observers ===

    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    // === Identity and Content ===

    pub fn directory(&self) -> &dyn ConversationDirectory {
        self.directory.as_ref()
    }

    pub fn content_parser(&self) -> &dyn ContentParser {
        self.content_parser.as_ref()
    }

    pub fn settings(&self) -> &ReactionSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("remotes", &"...")
            .field("store", &"KeyValueStore")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    reaction_remote: Option<Arc<dyn ReactionRemote>>,
    sponsored_remote: Option<Arc<dyn SponsoredRemote>>,
    store: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    directory: Option<Arc<dyn ConversationDirectory>>,
    content_parser: Option<Arc<dyn ContentParser>>,
    settings: Option<ReactionSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reaction_remote(mut self, remote: Arc<dyn ReactionRemote>) -> Self {
        self.reaction_remote = Some(remote);
        self
    }

    pub fn sponsored_remote(mut self, remote: Arc<dyn SponsoredRemote>) -> Self {
        self.sponsored_remote = Some(remote);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn ConversationDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn content_parser(mut self, parser: Arc<dyn ContentParser>) -> Self {
        self.content_parser = Some(parser);
        self
    }

    /// Defaults to [`ReactionSettings::default`] when not set
    pub fn settings(mut self, settings: ReactionSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.reaction_remote
                .ok_or_else(|| ServiceError::validation("reaction_remote is required"))?,
            self.sponsored_remote
                .ok_or_else(|| ServiceError::validation("sponsored_remote is required"))?,
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.notifier
                .ok_or_else(|| ServiceError::validation("notifier is required"))?,
            self.directory
                .ok_or_else(|| ServiceError::validation("directory is required"))?,
            self.content_parser
                .ok_or_else(|| ServiceError::validation("content_parser is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}
