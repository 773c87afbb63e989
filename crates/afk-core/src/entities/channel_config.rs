//! Channel settings

use serde::{Deserialize, Serialize};

/// Per-channel auto-reply settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_auto_reply")]
    pub auto_reply_enabled: bool,
}

fn default_auto_reply() -> bool {
    true
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            auto_reply_enabled: default_auto_reply(),
        }
    }
}

impl ChannelConfig {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            auto_reply_enabled: true,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            auto_reply_enabled: false,
        }
    }
}
