//! Data transfer objects for requests and responses

pub mod requests;
pub mod responses;

pub use requests::SetTagTitleRequest;
pub use responses::{AvailableReaction, AvailableReactions, SavedMessagesTags, SponsoredMessages};
