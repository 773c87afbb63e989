//! Session error types

use afk_core::DomainError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Failures that end a connection attempt or a live connection
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `apps.connections.open` failed
    #[error("Handshake failed: {0}")]
    Handshake(#[from] DomainError),

    /// Websocket connect or transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),
}

impl From<tungstenite::Error> for GatewayError {
    fn from(e: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(e))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
