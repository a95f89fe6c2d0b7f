//! Request coalescing.
//!
//! Collapses concurrent requests for the same key into one outstanding fetch.

mod request_group;

pub use request_group::{Join, RequestGroup, Waiter};
