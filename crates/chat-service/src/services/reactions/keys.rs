//! Persisted record keys and formats.

use chat_core::{
    ConversationId, Fingerprint, ReactionDefinition, ReactionListKind, ReactionType, TagScope,
    TopicId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(super) const CATALOG_KEY: &str = "reactions";
pub(super) const DEFAULT_REACTION_KEY: &str = "default_reaction";
pub(super) const TAGS_KEY_PREFIX: &str = "saved_messages_tags";

pub(super) fn list_key(kind: ReactionListKind) -> String {
    format!("reaction_list_{}", kind.as_str())
}

pub(super) fn tags_key(scope: TagScope) -> String {
    match scope {
        TagScope::Global => TAGS_KEY_PREFIX.to_string(),
        TagScope::Topic(topic) => format!("{TAGS_KEY_PREFIX}{}", topic.conversation_id()),
    }
}

/// Inverse of [`tags_key`]
pub(super) fn parse_tags_key(key: &str) -> Option<TagScope> {
    let suffix = key.strip_prefix(TAGS_KEY_PREFIX)?;
    if suffix.is_empty() {
        return Some(TagScope::Global);
    }
    let id = ConversationId::parse(suffix).ok()?;
    id.is_valid().then(|| TagScope::Topic(TopicId::new(id)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredCatalog {
    pub reactions: Vec<ReactionDefinition>,
    pub fingerprint: Fingerprint,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredList {
    pub reactions: Vec<ReactionType>,
    pub fingerprint: Fingerprint,
}
