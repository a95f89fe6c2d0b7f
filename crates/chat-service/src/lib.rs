//! # chat-service
//!
//! Application layer: the reaction and sponsored content managers, their
//! shared dependency context, the request/response DTOs, and the client
//! state that starts them from configuration.

pub mod dto;
pub mod services;
pub mod state;

pub use dto::{
    AvailableReaction, AvailableReactions, SavedMessagesTags, SetTagTitleRequest,
    SponsoredMessages,
};
pub use services::{
    PickerRequest, ReactionManager, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SponsoredManager,
};
pub use state::{ClientState, Collaborators};
