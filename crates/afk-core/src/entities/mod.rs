//! Domain entities - per-user presence and per-channel settings

mod channel_config;
mod presence;

pub use channel_config::ChannelConfig;
pub use presence::{MentionRecord, PresenceRecord};
