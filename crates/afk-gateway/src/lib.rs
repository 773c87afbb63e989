//! # afk-gateway
//!
//! Slack Socket Mode client for the AFK bot: keeps one websocket session alive,
//! acknowledges envelopes, and routes events and slash commands to their handlers.

pub mod app;
pub mod dispatch;
pub mod handlers;
pub mod protocol;
pub mod session;
pub mod slack;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{build_session, run};
pub use dispatch::EventDispatcher;
pub use handlers::{CommandRouter, HandlerError, HandlerResult, MessageHandler};
pub use protocol::{Envelope, EnvelopeKind, OutboundFrame};
pub use session::{
    Backoff, BackoffPolicy, FrameOutcome, GatewayError, SessionConfig, SessionManager, SessionState,
};
pub use slack::SlackApi;
