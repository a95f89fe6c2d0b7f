//! Response DTOs
//!
//! All response DTOs implement `Serialize` for hand-off to the presentation layer.

use chat_core::{
    ConversationId, ReactionType, SavedReactionTag, SponsoredItem, TagScope, UnavailabilityReason,
};
use serde::Serialize;

// ============================================================================
// Reaction Picker
// ============================================================================

/// One entry of a reaction picker section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableReaction {
    pub reaction_type: ReactionType,
    /// Shown, but usable only with a premium subscription
    pub needs_premium: bool,
}

/// Reactions grouped for a picker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AvailableReactions {
    pub top: Vec<AvailableReaction>,
    pub recent: Vec<AvailableReaction>,
    pub popular: Vec<AvailableReaction>,
    pub allow_custom_emoji: bool,
    /// The picker chooses saved-messages tags rather than reactions
    pub are_tags: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailability_reason: Option<UnavailabilityReason>,
}

impl AvailableReactions {
    /// Every reaction in display order
    pub fn all(&self) -> impl Iterator<Item = &AvailableReaction> {
        self.top.iter().chain(&self.recent).chain(&self.popular)
    }

    pub fn len(&self) -> usize {
        self.top.len() + self.recent.len() + self.popular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Saved-Messages Tags
// ============================================================================

/// Tags of one scope, most used first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedMessagesTags {
    pub scope: TagScope,
    pub tags: Vec<SavedReactionTag>,
}

// ============================================================================
// Sponsored Content
// ============================================================================

/// Validated sponsored items of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsoredMessages {
    pub conversation_id: ConversationId,
    pub items: Vec<SponsoredItem>,
}

impl SponsoredMessages {
    pub fn empty(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            items: Vec::new(),
        }
    }
}
