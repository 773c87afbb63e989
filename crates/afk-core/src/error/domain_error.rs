//! Domain errors - error types shared by every layer that talks to the outside world

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Control plane errors
    // =========================================================================
    #[error("Connection handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // =========================================================================
    // Messaging errors
    // =========================================================================
    #[error("Messaging API error: {0}")]
    MessagingFailed(String),

    // =========================================================================
    // Validation errors
    // =========================================================================
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    // =========================================================================
    // Infrastructure errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::HandshakeFailed(_) => "HANDSHAKE_FAILED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::MessagingFailed(_) => "MESSAGING_FAILED",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this error affects the connection lifecycle
    ///
    /// Only handshake and transport failures lead to a reconnect; everything else is
    /// confined to the frame that produced it.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::HandshakeFailed(_) | Self::Transport(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
