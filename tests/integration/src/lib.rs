//! Integration test utilities for linkguard
//!
//! This crate provides an in-memory bot harness for end-to-end moderation
//! flows and a bridge server harness for WebSocket tests.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
