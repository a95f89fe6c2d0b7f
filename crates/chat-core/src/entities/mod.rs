//! Domain entities - core business objects

mod reaction;
mod reaction_list;
mod saved_tag;
mod sponsored;

pub use reaction::{ChatReactions, ReactionAssets, ReactionDefinition, UnavailabilityReason};
pub use reaction_list::{promote_reaction, ReactionListKind, MAX_RECENT_REACTIONS};
pub use saved_tag::{
    saved_tags_fingerprint, SavedReactionTag, SavedReactionTags, MAX_TAG_TITLE_LENGTH,
};
pub use sponsored::{RawSponsoredItem, SponsoredContent, SponsoredItem};
