//! Test fixtures
//!
//! Builders for catalog entries, lists, tags and sponsored items.

use chat_core::{
    reaction_types_fingerprint, CatalogSnapshot, ConversationId, Fingerprint, RawSponsoredItem,
    ReactionAssets, ReactionDefinition, ReactionListSnapshot, ReactionType, SavedReactionTag,
    TopicId,
};
use chrono::{Duration, Utc};

/// Broadcast channel that carries sponsored content
pub const BROADCAST: ConversationId = ConversationId::new(-100_500);
/// Group without sponsored content
pub const GROUP: ConversationId = ConversationId::new(-42);
/// Channel behind the sponsored items
pub const SPONSOR: ConversationId = ConversationId::new(-100_777);
/// Conversation messages were saved from
pub const SAVED_FROM: ConversationId = ConversationId::new(1001);

pub fn emoji(value: &str) -> ReactionType {
    ReactionType::emoji(value)
}

pub fn emojis(values: &[&str]) -> Vec<ReactionType> {
    values.iter().map(|value| emoji(value)).collect()
}

pub fn topic() -> TopicId {
    TopicId::new(SAVED_FROM)
}

pub fn assets(name: &str) -> ReactionAssets {
    ReactionAssets {
        static_icon: format!("{name}.webp"),
        appear_animation: format!("{name}_appear.tgs"),
        select_animation: format!("{name}_select.tgs"),
        activate_animation: format!("{name}_activate.tgs"),
        effect_animation: format!("{name}_effect.tgs"),
        around_animation: None,
        center_animation: None,
    }
}

pub fn definition(value: &str) -> ReactionDefinition {
    ReactionDefinition::new(emoji(value), format!("Reaction {value}"), assets(value))
}

pub fn catalog(definitions: Vec<ReactionDefinition>, fingerprint: i64) -> CatalogSnapshot {
    CatalogSnapshot {
        reactions: definitions,
        fingerprint: Fingerprint::new(fingerprint),
    }
}

/// Snapshot whose fingerprint is computed the same way the client does
pub fn list_snapshot(values: &[&str]) -> ReactionListSnapshot {
    let reactions = emojis(values);
    ReactionListSnapshot {
        fingerprint: reaction_types_fingerprint(&reactions),
        reactions,
    }
}

pub fn tag(value: &str, title: &str, count: i32) -> SavedReactionTag {
    SavedReactionTag::new(emoji(value), title, count)
}

pub fn sponsored_item(random_id: &str, text: &str) -> RawSponsoredItem {
    RawSponsoredItem {
        random_id: random_id.to_string(),
        sponsor: SPONSOR,
        start_param: String::new(),
        text: text.to_string(),
        expires_at: Some(Utc::now() + Duration::minutes(5)),
    }
}

pub fn expired_sponsored_item(random_id: &str) -> RawSponsoredItem {
    RawSponsoredItem {
        expires_at: Some(Utc::now() - Duration::minutes(5)),
        ..sponsored_item(random_id, "Too late")
    }
}
