//! Value objects - immutable types that represent domain concepts

mod fingerprint;
mod ids;
mod reaction_type;

pub use fingerprint::{string_digest, Fingerprint, FingerprintBuilder};
pub use ids::{ConversationId, IdParseError, TagScope, TopicId};
pub use reaction_type::{reaction_types_fingerprint, ReactionType};
