//! Updates emitted to observers

mod update;

pub use update::{
    ActiveReactionsUpdate, DefaultReactionUpdate, ReactionListUpdate, SavedMessagesTagsUpdate,
    Update,
};
