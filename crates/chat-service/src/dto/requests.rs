//! Request DTOs
//!
//! Inputs that carry user-entered text implement `Validate` so they are
//! rejected before anything reaches the manager.

use chat_core::ReactionType;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Saved-Messages Tag Requests
// ============================================================================

/// Rename (or clear the name of) a saved-messages tag
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetTagTitleRequest {
    pub reaction_type: ReactionType,

    /// Empty clears the title
    #[validate(length(max = 12, message = "Tag title must be at most 12 characters"))]
    pub title: String,
}

impl SetTagTitleRequest {
    pub fn new(reaction_type: ReactionType, title: impl Into<String>) -> Self {
        Self {
            reaction_type,
            title: title.into(),
        }
    }
}
