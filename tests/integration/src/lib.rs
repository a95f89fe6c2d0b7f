//! Integration test utilities for the reaction and sponsored content managers
//!
//! This crate provides fake collaborators with call counters and gates, and
//! a harness wiring them into running managers.

pub mod fixtures;
pub mod helpers;

pub use fakes::*;
pub use fixtures::*;
pub use helpers::*;
