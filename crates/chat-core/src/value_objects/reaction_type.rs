//! Reaction type - the identity of a reaction independent of who used it

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fingerprint::{string_digest, Fingerprint, FingerprintBuilder};

/// Either a standard emoji or a custom emoji document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReactionType {
    Emoji(String),
    CustomEmoji(i64),
}

impl ReactionType {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self::Emoji(emoji.into())
    }

    pub const fn custom_emoji(id: i64) -> Self {
        Self::CustomEmoji(id)
    }

    /// An empty reaction type never identifies a real reaction
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Emoji(emoji) => emoji.is_empty(),
            Self::CustomEmoji(id) => *id == 0,
        }
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::CustomEmoji(_))
    }

    /// Stable digest contributed to list and tag fingerprints
    pub fn digest(&self) -> u64 {
        match self {
            Self::Emoji(emoji) => string_digest(emoji),
            Self::CustomEmoji(id) => *id as u64,
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emoji(emoji) => write!(f, "{emoji}"),
            Self::CustomEmoji(id) => write!(f, "custom:{id}"),
        }
    }
}

/// Default fingerprint of an ordered reaction list
pub fn reaction_types_fingerprint(reaction_types: &[ReactionType]) -> Fingerprint {
    let mut builder = FingerprintBuilder::new();
    for reaction_type in reaction_types {
        builder.push(reaction_type.digest());
    }
    builder.finish()
}
