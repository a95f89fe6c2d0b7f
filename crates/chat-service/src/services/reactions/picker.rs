//! Reaction picker layout.
//!
//! Groups the reactions allowed in a context into "top", "recent" and
//! "popular" sections. Pure: works on whatever the caches currently hold,
//! including nothing at all.

use std::collections::HashSet;

use chat_core::{ChatReactions, ReactionType, UnavailabilityReason};

use crate::dto::{AvailableReaction, AvailableReactions};

pub const MIN_ROW_SIZE: i32 = 5;
pub const MAX_ROW_SIZE: i32 = 25;
pub const DEFAULT_ROW_SIZE: i32 = 8;

/// What to lay out and for whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    /// Reactions the picker may offer
    pub available: ChatReactions,
    /// Reactions usable without premium in this context
    pub active: ChatReactions,
    pub row_size: i32,
    /// Lay out saved-messages tags instead of reactions
    pub is_tag: bool,
    pub unavailability_reason: Option<UnavailabilityReason>,
}

impl PickerRequest {
    /// Every active catalog reaction plus any custom emoji, the latter premium-only
    pub fn all_reactions(row_size: i32) -> Self {
        Self {
            available: ChatReactions::all(true),
            active: ChatReactions::all(false),
            row_size,
            is_tag: false,
            unavailability_reason: None,
        }
    }
}

/// Cached state the layout reads
pub(super) struct PickerSources<'a> {
    /// Active catalog reactions in catalog order
    pub catalog_active: &'a [ReactionType],
    /// Top list, or the default-tag list when laying out tags
    pub top: &'a [ReactionType],
    pub recent: &'a [ReactionType],
    pub is_premium: bool,
}

/// Row sizes outside the supported range fall back to the default
pub fn clamp_row_size(row_size: i32) -> usize {
    let row_size = if (MIN_ROW_SIZE..=MAX_ROW_SIZE).contains(&row_size) {
        row_size
    } else {
        DEFAULT_ROW_SIZE
    };
    row_size as usize
}

pub(super) fn sort_available_reactions(
    sources: &PickerSources<'_>,
    request: &PickerRequest,
) -> AvailableReactions {
    let row_size = clamp_row_size(request.row_size);
    let layout = Layout {
        request,
        catalog_index: sources.catalog_active.iter().collect(),
    };
    let mut added = HashSet::new();

    let (top, recent) = if sources.is_premium {
        let top = layout.section(sources.top.iter().take(2 * row_size), &mut added);
        let recent = layout.section(sources.recent.iter(), &mut added);
        (top, recent)
    } else {
        (layout.section(sources.top.iter(), &mut added), Vec::new())
    };

    let popular = if request.available.allow_all_regular {
        let everything = sources
            .catalog_active
            .iter()
            .chain(&request.available.reaction_types);
        layout.section(everything, &mut added)
    } else {
        layout.section(request.available.reaction_types.iter(), &mut added)
    };

    AvailableReactions {
        top,
        recent,
        popular,
        allow_custom_emoji: request.available.allow_all_custom,
        are_tags: request.is_tag,
        unavailability_reason: request.unavailability_reason,
    }
}

struct Layout<'a> {
    request: &'a PickerRequest,
    catalog_index: HashSet<&'a ReactionType>,
}

impl Layout<'_> {
    fn allows(&self, reactions: &ChatReactions, reaction_type: &ReactionType) -> bool {
        if reaction_type.is_custom() {
            reactions.allow_all_custom || reactions.reaction_types.contains(reaction_type)
        } else if reactions.allow_all_regular {
            self.catalog_index.contains(reaction_type)
        } else {
            reactions.reaction_types.contains(reaction_type)
        }
    }

    /// Available candidates not placed in an earlier section, in candidate order
    fn section<'r>(
        &self,
        candidates: impl Iterator<Item = &'r ReactionType>,
        added: &mut HashSet<ReactionType>,
    ) -> Vec<AvailableReaction> {
        let mut section = Vec::new();
        for reaction_type in candidates {
            if !self.allows(&self.request.available, reaction_type) {
                continue;
            }
            if !added.insert(reaction_type.clone()) {
                continue;
            }
            section.push(AvailableReaction {
                reaction_type: reaction_type.clone(),
                needs_premium: reaction_type.is_custom()
                    && !self.allows(&self.request.active, reaction_type),
            });
        }
        section
    }
}
