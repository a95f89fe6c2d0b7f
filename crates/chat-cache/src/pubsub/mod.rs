//! Update fan-out to local observers.

mod publisher;

pub use publisher::UpdatePublisher;
