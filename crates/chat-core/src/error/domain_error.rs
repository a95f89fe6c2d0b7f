//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ConversationId, ReactionType, TopicId};

/// Failure reported by the remote authority for one request
///
/// Cloneable so one failure can be handed to every caller that was waiting
/// on the same coalesced request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Remote error {code}: {message}")]
pub struct RemoteError {
    pub code: i32,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Delivered to waiters whose request is outstanding during shutdown
    pub fn aborted() -> Self {
        Self::new(500, "Request aborted")
    }

    pub fn is_aborted(&self) -> bool {
        self.code == 500 && self.message == "Request aborted"
    }
}

/// Failure of the local key-value store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt record under {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Saved messages topic not found: {0}")]
    TopicNotFound(TopicId),

    #[error("Reaction not found: {0}")]
    ReactionNotFound(String),

    #[error("Sponsored message not found")]
    SponsoredMessageNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Tag title too long: max {max} characters")]
    TagTitleTooLong { max: usize },

    #[error("Reaction not available: {0}")]
    ReactionUnavailable(ReactionType),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Get an error code string for client responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",
            Self::SponsoredMessageNotFound => "UNKNOWN_SPONSORED_MESSAGE",

            Self::TagTitleTooLong { .. } => "TAG_TITLE_TOO_LONG",
            Self::ReactionUnavailable(_) => "REACTION_UNAVAILABLE",
            Self::ValidationError(_) => "VALIDATION_ERROR",

            Self::Remote(_) => "REMOTE_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound(_)
                | Self::TopicNotFound(_)
                | Self::ReactionNotFound(_)
                | Self::SponsoredMessageNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TagTitleTooLong { .. } | Self::ReactionUnavailable(_) | Self::ValidationError(_)
        )
    }
}
