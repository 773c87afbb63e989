//! # afk-core
//!
//! Domain layer for the AFK bot: presence records, channel settings, slash commands,
//! the away-time policy, and the ports the infrastructure crates implement.
//! This crate has no dependency on Redis, Slack, or the websocket transport.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChannelConfig, MentionRecord, PresenceRecord};
pub use error::{DomainError, DomainResult};
pub use traits::{Clock, ConnectionOpener, MessagingGateway, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use traits::FixedClock;
pub use value_objects::{
    next_day_boundary, seconds_until, seconds_until_next_day_boundary, AwayArgs, Command,
    DEFAULT_LUNCH_MINUTES, NEXT_DAY_BOUNDARY_HOURS,
};
