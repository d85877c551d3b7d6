//! Integration test utilities for the sync engine
//!
//! In-memory implementations of every port, plus a harness that wires
//! them into a [`roster_sync::SyncContext`].

pub mod fakes;
pub mod fixtures;

pub use fakes::*;
pub use fixtures::*;
