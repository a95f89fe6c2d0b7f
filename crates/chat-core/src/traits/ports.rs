//! Ports - the interfaces of every collaborator outside the cache engine
//!
//! The domain layer defines what it needs; the transport, storage engine,
//! identity lookup and content parsing live elsewhere and implement these.

use async_trait::async_trait;

use crate::entities::{
    RawSponsoredItem, ReactionDefinition, ReactionListKind, SavedReactionTag, SponsoredContent,
};
use crate::error::{RemoteError, StoreError};
use crate::events::Update;
use crate::value_objects::{ConversationId, Fingerprint, ReactionType, TopicId};

/// Result type for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Answer to a fingerprint-aware fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The caller's fingerprint is current
    NotModified,
    Modified(T),
}

/// Full reaction catalog as sent by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub reactions: Vec<ReactionDefinition>,
    pub fingerprint: Fingerprint,
}

/// One ranked reaction list as sent by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionListSnapshot {
    pub reactions: Vec<ReactionType>,
    pub fingerprint: Fingerprint,
}

// ============================================================================
// Remote Authority
// ============================================================================

/// Remote calls backing the reaction collections
///
/// Each call is a single attempt; retry policy belongs to the implementation.
#[async_trait]
pub trait ReactionRemote: Send + Sync {
    async fn get_available_reactions(
        &self,
        fingerprint: Fingerprint,
    ) -> RemoteResult<Fetched<CatalogSnapshot>>;

    async fn get_reaction_list(
        &self,
        kind: ReactionListKind,
        fingerprint: Fingerprint,
    ) -> RemoteResult<Fetched<ReactionListSnapshot>>;

    async fn clear_reaction_list(&self, kind: ReactionListKind) -> RemoteResult<()>;

    async fn set_default_reaction(&self, reaction_type: &ReactionType) -> RemoteResult<()>;

    /// `topic == None` requests the global tag set.
    ///
    /// The fingerprint is the locally computed aggregate of the cached tags.
    async fn get_saved_tags(
        &self,
        topic: Option<TopicId>,
        fingerprint: Fingerprint,
    ) -> RemoteResult<Fetched<Vec<SavedReactionTag>>>;

    async fn update_saved_tag(&self, reaction_type: &ReactionType, title: &str) -> RemoteResult<()>;
}

/// Remote calls backing sponsored content
#[async_trait]
pub trait SponsoredRemote: Send + Sync {
    async fn get_sponsored_items(
        &self,
        conversation_id: ConversationId,
    ) -> RemoteResult<Vec<RawSponsoredItem>>;

    async fn view_sponsored_item(
        &self,
        conversation_id: ConversationId,
        random_id: &str,
    ) -> RemoteResult<()>;
}

// ============================================================================
// Local Persistence
// ============================================================================

/// Byte-oriented key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    async fn erase(&self, key: &str) -> StoreResult<()>;

    /// All entries whose key starts with `prefix`, in key order
    async fn get_by_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>>;
}

// ============================================================================
// Observers
// ============================================================================

/// Receives one update per observable change
pub trait NotificationSink: Send + Sync {
    fn notify(&self, update: Update);
}

// ============================================================================
// Identity and Content
// ============================================================================

/// Kind of a known conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    Private,
    Group,
    /// Discussion channel
    Channel,
    /// Broadcast channel, the only kind that carries sponsored content
    Broadcast,
}

/// Answers what the current account knows and may see
pub trait ConversationDirectory: Send + Sync {
    /// `None` when the conversation is unknown or inaccessible
    fn conversation_kind(&self, conversation_id: ConversationId) -> Option<ConversationKind>;

    fn has_saved_topic(&self, topic: TopicId) -> bool {
        topic.is_valid() && self.conversation_kind(topic.conversation_id()).is_some()
    }

    fn is_premium(&self) -> bool;
}

/// Turns raw promotional text into structured content
pub trait ContentParser: Send + Sync {
    fn parse(&self, text: &str, sponsor: ConversationId) -> Result<SponsoredContent, String>;
}
