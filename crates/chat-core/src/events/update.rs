//! Updates - one event per observable state change
//!
//! Every update carries the new logical state, never a diff, so an observer
//! that missed earlier updates is still correct after the latest one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ReactionListKind, SavedReactionTag};
use crate::value_objects::{ReactionType, TagScope};

/// All observable updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Update {
    ActiveReactions(ActiveReactionsUpdate),
    ReactionList(ReactionListUpdate),
    DefaultReaction(DefaultReactionUpdate),
    SavedMessagesTags(SavedMessagesTagsUpdate),
}

impl Update {
    /// Get the update type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ActiveReactions(_) => "ACTIVE_REACTIONS",
            Self::ReactionList(_) => "REACTION_LIST",
            Self::DefaultReaction(_) => "DEFAULT_REACTION",
            Self::SavedMessagesTags(_) => "SAVED_MESSAGES_TAGS",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ActiveReactions(e) => e.timestamp,
            Self::ReactionList(e) => e.timestamp,
            Self::DefaultReaction(e) => e.timestamp,
            Self::SavedMessagesTags(e) => e.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveReactionsUpdate {
    pub reactions: Vec<ReactionType>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionListUpdate {
    pub kind: ReactionListKind,
    pub reactions: Vec<ReactionType>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultReactionUpdate {
    pub reaction: ReactionType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMessagesTagsUpdate {
    pub scope: TagScope,
    pub tags: Vec<SavedReactionTag>,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Update Creation Helpers
// ============================================================================

impl Update {
    pub fn active_reactions(reactions: Vec<ReactionType>) -> Self {
        Self::ActiveReactions(ActiveReactionsUpdate {
            reactions,
            timestamp: Utc::now(),
        })
    }

    pub fn reaction_list(kind: ReactionListKind, reactions: Vec<ReactionType>) -> Self {
        Self::ReactionList(ReactionListUpdate {
            kind,
            reactions,
            timestamp: Utc::now(),
        })
    }

    pub fn default_reaction(reaction: ReactionType) -> Self {
        Self::DefaultReaction(DefaultReactionUpdate {
            reaction,
            timestamp: Utc::now(),
        })
    }

    pub fn saved_messages_tags(scope: TagScope, tags: Vec<SavedReactionTag>) -> Self {
        Self::SavedMessagesTags(SavedMessagesTagsUpdate {
            scope,
            tags,
            timestamp: Utc::now(),
        })
    }
}
