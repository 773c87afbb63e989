//! Presence record - a user's working day and the mentions received while away

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A mention of an away user, captured when the auto-reply fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRecord {
    /// Channel the mention was posted in
    pub channel: String,
    /// User who posted the mention
    pub author: String,
    /// Message text with the mentioned user's own token removed
    pub text: String,
    /// Slack timestamp of the triggering message
    pub event_time: String,
}

impl MentionRecord {
    /// Build a mention record, stripping `<@user_id>` from the text
    #[must_use]
    pub fn stripped(
        user_id: &str,
        channel: impl Into<String>,
        author: impl Into<String>,
        text: &str,
        event_time: impl Into<String>,
    ) -> Self {
        let token = format!("<@{user_id}>");
        Self {
            channel: channel.into(),
            author: author.into(),
            text: text.replace(&token, ""),
            event_time: event_time.into(),
        }
    }
}

/// Durable per-user presence record
///
/// Stored as JSON. Unknown or missing fields fall back to their defaults so records
/// written by older versions still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub begin_time: Option<DateTime<Local>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Local>>,
    #[serde(default)]
    pub mentions: Vec<MentionRecord>,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Local>>,
}

impl PresenceRecord {
    /// Record synthesized for a user the store has never seen
    #[must_use]
    pub fn fresh(now: DateTime<Local>) -> Self {
        Self {
            begin_time: Some(now),
            last_active_at: Some(now),
            ..Self::default()
        }
    }

    /// Append a mention, keeping earlier entries in order
    pub fn push_mention(&mut self, mention: MentionRecord) {
        self.mentions.push(mention);
    }

    /// Mark the end of the working day
    pub fn finish(&mut self, now: DateTime<Local>) {
        self.end_time = Some(now);
    }
}
