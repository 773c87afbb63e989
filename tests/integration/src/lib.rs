//! Integration test utilities for the AFK bot
//!
//! This crate provides a scripted Socket Mode server, recording fakes, and frame
//! builders for end-to-end tests of the session and its handlers.

pub mod fixtures;

pub use fixtures::*;
pub use helpers::*;
