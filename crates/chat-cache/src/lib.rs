//! # chat-cache
//!
//! Generic cache engine building blocks.
//!
//! ## Features
//!
//! - **Coalescing**: one outstanding fetch per key, with fan-out to every waiter
//! - **Versioned Cache**: value plus fingerprint, deciding when a reload is due
//! - **Store**: in-memory key-value store, JSON codec, ordered write queue
//! - **Pub/Sub**: broadcast of updates to local observers
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::{Join, RequestGroup, VersionedCache};
//!
//! let mut group: RequestGroup<&str, Result<Vec<u8>, RemoteError>> = RequestGroup::new();
//! let (tx, rx) = tokio::sync::oneshot::channel();
//! if group.acquire_or_join("reactions", Some(tx)) == Join::Initiate {
//!     // issue the remote fetch; on completion:
//!     group.complete(&"reactions", Ok(bytes));
//! }
//! ```

pub mod coalesce;
pub mod pubsub;
pub mod store;
pub mod versioned;

pub use coalesce::{Join, RequestGroup, Waiter};
pub use pubsub::UpdatePublisher;
pub use store::{decode, encode, MemoryStore, PersistQueue, StoreStats};
pub use versioned::VersionedCache;
