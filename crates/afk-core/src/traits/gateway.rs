//! Messaging and control-plane ports
//!
//! The session layer and the handlers only ever need "post this text" and "what is
//! this user called"; the Slack Web API implementation lives in `afk-gateway`.

use async_trait::async_trait;

use crate::error::DomainResult;

#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Post `text` to `channel`, optionally inside the thread rooted at `thread_ts`
    async fn post(&self, channel: &str, text: &str, thread_ts: Option<&str>) -> DomainResult<()>;

    /// Display name of a user; implementations fall back to the user id on failure
    async fn lookup_display_name(&self, user_id: &str) -> String;
}

#[async_trait]
pub trait ConnectionOpener: Send + Sync {
    /// Request a one-time websocket URL from the control plane
    async fn open_connection(&self) -> DomainResult<String>;
}
