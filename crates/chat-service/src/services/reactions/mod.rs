//! Reaction manager
//!
//! Reaction catalog, ranked reaction lists, default reaction and
//! saved-messages tags, owned by a single actor task.

mod actor;
mod catalog;
mod command;
mod keys;
mod lists;
mod manager;
mod picker;
mod tags;

pub use manager::ReactionManager;
pub use picker::{clamp_row_size, PickerRequest, DEFAULT_ROW_SIZE, MAX_ROW_SIZE, MIN_ROW_SIZE};
