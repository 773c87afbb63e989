//! Socket Mode frame format
//!
//! Every inbound text frame is an envelope `{type, envelope_id?, payload?, reason?}`.
//! Any JSON object decodes; a missing `type` becomes [`EnvelopeKind::Unknown`] so the
//! envelope id is still acknowledged.
//! The only frame the bot writes is the acknowledgment `{"envelope_id": "..."}`;
//! keepalives are websocket Ping control frames.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Text frames sent by Slack's own liveness probe start with this marker
pub const PEER_LIVENESS_PREFIX: &str = "Ping from";

/// Whether a raw text frame is a peer liveness probe rather than an envelope
#[must_use]
pub fn is_peer_liveness(text: &str) -> bool {
    text.starts_with(PEER_LIVENESS_PREFIX)
}

/// Envelope type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// Connection accepted
    Hello,
    /// Server is about to drop the connection
    Disconnect,
    /// `events_api`
    Event,
    /// `slash_commands`
    Command,
    /// `interactive` (buttons, modals)
    Interactive,
    /// Anything else, kept for logging
    Unknown(String),
}

impl EnvelopeKind {
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "hello" => Self::Hello,
            "disconnect" => Self::Disconnect,
            "events_api" => Self::Event,
            "slash_commands" => Self::Command,
            "interactive" => Self::Interactive,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hello => "hello",
            Self::Disconnect => "disconnect",
            Self::Event => "events_api",
            Self::Command => "slash_commands",
            Self::Interactive => "interactive",
            Self::Unknown(other) => other,
        }
    }

    /// Whether the envelope goes to the event dispatcher
    #[must_use]
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, Self::Event | Self::Command)
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    envelope_id: Option<String>,
    #[serde(default)]
    payload: Value,
    #[serde(default)]
    reason: Option<String>,
}

/// One decoded inbound frame
#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: Option<String>,
    pub kind: EnvelopeKind,
    pub payload: Value,
    /// Set on `disconnect` envelopes
    pub reason: Option<String>,
}

impl Envelope {
    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope = serde_json::from_str(text)?;
        Ok(Self {
            id: raw.envelope_id,
            kind: EnvelopeKind::from_wire(raw.kind.as_deref().unwrap_or_default()),
            payload: raw.payload,
            reason: raw.reason,
        })
    }

    /// Envelope id to acknowledge, if the frame requires one
    #[must_use]
    pub fn ack_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Acknowledgment frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckFrame {
    pub envelope_id: String,
}

impl AckFrame {
    #[must_use]
    pub fn new(envelope_id: impl Into<String>) -> Self {
        Self {
            envelope_id: envelope_id.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A frame queued for the connection writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Ack(AckFrame),
    /// Websocket Ping control frame
    Keepalive,
}

impl OutboundFrame {
    #[must_use]
    pub fn ack(envelope_id: impl Into<String>) -> Self {
        Self::Ack(AckFrame::new(envelope_id))
    }
}
