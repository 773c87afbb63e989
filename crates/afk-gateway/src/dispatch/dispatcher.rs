//! Event dispatcher
//!
//! Routes decoded envelopes to the message handler or the command router. Handler
//! errors stop here; the session never sees them.

use crate::handlers::{CommandRouter, HandlerError, MessageHandler};
use crate::protocol::{Envelope, EnvelopeKind, EventType, MessageEvent, SlashCommand};
use serde_json::Value;

/// Stateless router from envelopes to handlers
pub struct EventDispatcher {
    messages: MessageHandler,
    commands: CommandRouter,
}

impl EventDispatcher {
    pub fn new(messages: MessageHandler, commands: CommandRouter) -> Self {
        Self { messages, commands }
    }

    /// Route one envelope; non-dispatchable kinds are ignored
    pub async fn dispatch(&self, envelope: &Envelope) {
        match envelope.kind {
            EnvelopeKind::Event => self.dispatch_event(&envelope.payload).await,
            EnvelopeKind::Command => self.dispatch_command(&envelope.payload).await,
            _ => {
                tracing::trace!(kind = %envelope.kind, "Envelope not dispatchable");
            }
        }
    }

    async fn dispatch_event(&self, payload: &Value) {
        let event = match MessageEvent::from_payload(payload) {
            Ok(event) => event,
            Err(e) => {
                let e = HandlerError::from(e);
                tracing::debug!(code = e.code(), error = %e, "Dropping undecodable event");
                return;
            }
        };

        match event.kind() {
            EventType::Message | EventType::AppMention => {
                if let Err(e) = self.messages.handle(&event).await {
                    tracing::warn!(
                        channel = %event.channel,
                        ts = %event.ts,
                        code = e.code(),
                        error = %e,
                        "Message handler failed"
                    );
                }
            }
            EventType::Other(event_type) => {
                tracing::trace!(event_type = %event_type, "Event type not handled");
            }
        }
    }

    async fn dispatch_command(&self, payload: &Value) {
        match SlashCommand::from_payload(payload) {
            Ok(invocation) => {
                self.commands.handle(&invocation).await;
            }
            Err(e) => {
                let e = HandlerError::from(e);
                tracing::warn!(code = e.code(), error = %e, "Dropping undecodable slash command");
            }
        }
    }
}
