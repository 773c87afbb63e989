//! Minimal Slack Web API wrapper
//!
//! One instance per token: the bot token posts messages and looks up users, the
//! app-level token opens Socket Mode connections.

use afk_core::{ConnectionOpener, DomainError, DomainResult, MessagingGateway};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectionsOpenResponse {
    ok: bool,
    error: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    error: Option<String>,
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    name: String,
}

fn api_error(error: Option<String>) -> String {
    error.unwrap_or_else(|| "unknown error".into())
}

fn transport_error(e: &reqwest::Error) -> DomainError {
    DomainError::Transport(e.to_string())
}

pub struct SlackApi {
    client: Client,
    base: String,
    token: String,
}

impl SlackApi {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }

    pub async fn post_message(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> DomainResult<()> {
        let mut body = serde_json::json!({
            "channel": channel,
            "text": text,
        });
        if let Some(thread_ts) = thread_ts {
            body["thread_ts"] = serde_json::Value::String(thread_ts.to_string());
        }

        let parsed: SlackResponse = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        if !parsed.ok {
            return Err(DomainError::MessagingFailed(api_error(parsed.error)));
        }
        Ok(())
    }

    pub async fn user_name(&self, user_id: &str) -> DomainResult<String> {
        let parsed: UsersInfoResponse = self
            .client
            .get(self.url("users.info"))
            .bearer_auth(&self.token)
            .query(&[("user", user_id)])
            .send()
            .await
            .map_err(|e| transport_error(&e))?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        if !parsed.ok {
            return Err(DomainError::MessagingFailed(api_error(parsed.error)));
        }
        parsed
            .user
            .map(|user| user.name)
            .ok_or_else(|| DomainError::MalformedPayload("users.info without user".into()))
    }

    pub async fn open_socket_url(&self) -> DomainResult<String> {
        let parsed: ConnectionsOpenResponse = self
            .client
            .post(self.url("apps.connections.open"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?
            .json()
            .await
            .map_err(|e| transport_error(&e))?;

        if !parsed.ok {
            return Err(DomainError::HandshakeFailed(api_error(parsed.error)));
        }
        parsed
            .url
            .ok_or_else(|| DomainError::HandshakeFailed("missing url".into()))
    }
}

#[async_trait]
impl MessagingGateway for SlackApi {
    async fn post(&self, channel: &str, text: &str, thread_ts: Option<&str>) -> DomainResult<()> {
        self.post_message(channel, text, thread_ts).await
    }

    async fn lookup_display_name(&self, user_id: &str) -> String {
        match self.user_name(user_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User lookup failed, using id");
                user_id.to_string()
            }
        }
    }
}

#[async_trait]
impl ConnectionOpener for SlackApi {
    async fn open_connection(&self) -> DomainResult<String> {
        self.open_socket_url().await
    }
}

impl std::fmt::Debug for SlackApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackApi")
            .field("base", &self.base)
            .field("token", &"<redacted>")
            .finish()
    }
}
