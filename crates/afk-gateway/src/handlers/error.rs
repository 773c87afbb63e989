//! Handler error types

use afk_cache::StoreError;
use afk_core::DomainError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload did not have the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Presence store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Messaging gateway failure
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Short machine-readable code for log fields
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::Store(_) => "STORE_ERROR",
            Self::Domain(e) => e.code(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
