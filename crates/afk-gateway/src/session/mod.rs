//! Socket Mode session: connection lifecycle, reconnection, keepalive

mod backoff;
mod error;
mod manager;
mod state;

pub use backoff::{Backoff, BackoffPolicy};
pub use error::{GatewayError, GatewayResult};
pub use manager::{FrameOutcome, SessionConfig, SessionManager};
pub use state::SessionState;
