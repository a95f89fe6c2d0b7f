//! Cache managers
//!
//! Each manager is an actor task behind a cloneable handle. State is only
//! touched by the actor; callers talk to it through messages.

pub mod context;
pub mod error;
pub mod reactions;
pub mod sponsored;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reactions::{PickerRequest, ReactionManager};
pub use sponsored::SponsoredManager;
