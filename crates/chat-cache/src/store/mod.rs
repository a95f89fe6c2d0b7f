//! Local persistence plumbing.
//!
//! Provides an in-memory key-value store, the JSON record codec, and the
//! ordered queue through which the cache engine writes without waiting.

mod codec;
mod memory;
mod persist_queue;

pub use codec::{decode, encode};
pub use memory::{MemoryStore, StoreStats};
pub use persist_queue::PersistQueue;
