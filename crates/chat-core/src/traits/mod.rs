//! Ports implemented by the infrastructure around the cache engine

mod ports;

pub use ports::{
    CatalogSnapshot, ContentParser, ConversationDirectory, ConversationKind, Fetched,
    KeyValueStore, NotificationSink, ReactionListSnapshot, ReactionRemote, RemoteResult,
    SponsoredRemote, StoreResult,
};
