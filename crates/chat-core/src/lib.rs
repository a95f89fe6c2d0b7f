//! # chat-core
//!
//! Domain layer of the client reaction and sponsored-content caches: identifiers,
//! entities, errors, updates, and the ports implemented by the transport and
//! storage around them. This crate has zero dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    promote_reaction, saved_tags_fingerprint, ChatReactions, RawSponsoredItem, ReactionAssets,
    ReactionDefinition, ReactionListKind, SavedReactionTag, SavedReactionTags, SponsoredContent,
    SponsoredItem, UnavailabilityReason, MAX_RECENT_REACTIONS, MAX_TAG_TITLE_LENGTH,
};
pub use error::{DomainError, RemoteError, StoreError};
pub use events::Update;
pub use traits::{
    CatalogSnapshot, ContentParser, ConversationDirectory, ConversationKind, Fetched,
    KeyValueStore, NotificationSink, ReactionListSnapshot, ReactionRemote, RemoteResult,
    SponsoredRemote, StoreResult,
};
pub use value_objects::{
    reaction_types_fingerprint, ConversationId, Fingerprint, FingerprintBuilder,
    IdParseError, ReactionType, TagScope, TopicId,
};
