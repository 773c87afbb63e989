//! Payloads carried inside dispatchable envelopes

use serde::Deserialize;
use serde_json::Value;

/// Nested event type of an `events_api` envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    Message,
    AppMention,
    Other(String),
}

/// `payload.event` of an `events_api` envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl MessageEvent {
    /// Extract the event from an `events_api` payload
    pub fn from_payload(payload: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(payload.get("event").unwrap_or(&Value::Null))
    }

    #[must_use]
    pub fn kind(&self) -> EventType {
        match self.event_type.as_str() {
            "message" => EventType::Message,
            "app_mention" => EventType::AppMention,
            other => EventType::Other(other.to_string()),
        }
    }

    /// Timestamp replies are threaded under: the parent thread if any, else this message
    #[must_use]
    pub fn reply_thread(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// `payload` of a `slash_commands` envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub channel_id: String,
    pub user_id: String,
}

impl SlashCommand {
    pub fn from_payload(payload: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(payload)
    }
}
