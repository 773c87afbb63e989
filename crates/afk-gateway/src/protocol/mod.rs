//! Socket Mode protocol definitions
//!
//! Inbound envelopes, the payloads they carry, and outbound frames.

mod frames;
mod payloads;

pub use frames::{is_peer_liveness, AckFrame, Envelope, EnvelopeKind, OutboundFrame, PEER_LIVENESS_PREFIX};
pub use payloads::{EventType, MessageEvent, SlashCommand};
