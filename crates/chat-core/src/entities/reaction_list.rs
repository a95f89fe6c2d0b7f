//! Ranked reaction lists (recent, top, default tags)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::ReactionType;

/// Maximum length of the recent reactions list
pub const MAX_RECENT_REACTIONS: usize = 100;

/// Kind of a server-ranked reaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionListKind {
    /// Reactions recently used by the current user
    Recent,
    /// Reactions ranked by the server for the current user
    Top,
    /// Reactions suggested as saved-messages tags
    DefaultTag,
}

impl ReactionListKind {
    pub const ALL: [Self; 3] = [Self::Recent, Self::Top, Self::DefaultTag];

    /// Local capacity; `None` when the server decides the length
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Recent => Some(MAX_RECENT_REACTIONS),
            Self::Top | Self::DefaultTag => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Top => "top",
            Self::DefaultTag => "default_tag",
        }
    }
}

impl fmt::Display for ReactionListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Move `reaction_type` to the front of `list`, evicting from the back past `capacity`
///
/// Returns false when the reaction was already first and nothing changed.
pub fn promote_reaction(
    list: &mut Vec<ReactionType>,
    reaction_type: ReactionType,
    capacity: usize,
) -> bool {
    if list.first() == Some(&reaction_type) {
        return false;
    }
    if let Some(position) = list.iter().position(|existing| *existing == reaction_type) {
        list.remove(position);
    }
    list.insert(0, reaction_type);
    list.truncate(capacity);
    true
}
