//! Slash command handling
//!
//! Every command replies in the invoking channel. Unknown commands and failed commands
//! are logged and get no reply.

use super::{replies, HandlerResult};
use crate::protocol::SlashCommand;
use afk_cache::PresenceStore;
use afk_core::{
    next_day_boundary, seconds_until, seconds_until_next_day_boundary, AwayArgs,
    ChannelConfig, Clock, Command, MessagingGateway, PresenceRecord, DEFAULT_LUNCH_MINUTES,
};
use chrono::{DateTime, Duration, Local};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AwayKind {
    Afk,
    Lunch,
}

/// Maps slash commands to presence-state transitions
pub struct CommandRouter {
    store: PresenceStore,
    gateway: Arc<dyn MessagingGateway>,
    clock: Arc<dyn Clock>,
    finish_message: Option<String>,
}

impl CommandRouter {
    pub fn new(
        store: PresenceStore,
        gateway: Arc<dyn MessagingGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            finish_message: None,
        }
    }

    /// Closing line of `/finish` replies when no per-day message is stored
    pub fn with_finish_message(mut self, message: Option<String>) -> Self {
        self.finish_message = message;
        self
    }

    /// Run a slash command and post its reply
    ///
    /// Returns the reply text, or `None` when the command was unknown or failed.
    pub async fn handle(&self, invocation: &SlashCommand) -> Option<String> {
        let command = Command::parse(&invocation.command);

        let reply = match self.execute(&command, invocation).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                tracing::info!(
                    command = %command,
                    user_id = %invocation.user_id,
                    "Unknown command ignored"
                );
                return None;
            }
            Err(e) => {
                tracing::error!(
                    command = %command,
                    user_id = %invocation.user_id,
                    code = e.code(),
                    error = %e,
                    "Command failed"
                );
                return None;
            }
        };

        if let Err(e) = self.gateway.post(&invocation.channel_id, &reply, None).await {
            tracing::warn!(
                command = %command,
                channel = %invocation.channel_id,
                error = %e,
                "Failed to post command reply"
            );
        }

        Some(reply)
    }

    /// Apply a command's state transition and build its reply
    ///
    /// Unknown commands touch nothing and yield `Ok(None)`.
    pub async fn execute(
        &self,
        command: &Command,
        invocation: &SlashCommand,
    ) -> HandlerResult<Option<String>> {
        let user_id = invocation.user_id.as_str();
        let reply = match command {
            Command::Afk { minutes } => {
                self.away(AwayKind::Afk, *minutes, invocation).await?
            }
            Command::Lunch => self.away(AwayKind::Lunch, None, invocation).await?,
            Command::Start => self.start(user_id).await?,
            Command::Finish => self.finish(user_id, invocation.text.trim()).await?,
            Command::Comeback => self.comeback(user_id).await?,
            Command::EnableAfk => {
                self.toggle_auto_reply(&invocation.channel_id, true)
                    .await?
            }
            Command::DisableAfk => {
                self.toggle_auto_reply(&invocation.channel_id, false)
                    .await?
            }
            Command::Unknown(_) => return Ok(None),
        };

        tracing::info!(command = %command, user_id = %user_id, "Command handled");
        Ok(Some(reply))
    }

    async fn away(
        &self,
        kind: AwayKind,
        command_minutes: Option<u32>,
        invocation: &SlashCommand,
    ) -> HandlerResult<String> {
        let user_id = invocation.user_id.as_str();
        let (minutes, text) = match command_minutes {
            Some(minutes) => (Some(minutes), invocation.text.trim().to_string()),
            None => {
                let args = AwayArgs::parse(&invocation.text);
                (args.minutes, args.message)
            }
        };
        // A zero duration would make the flag permanent
        let minutes = minutes.filter(|m| *m > 0);

        let now = self.clock.now();
        let name = self.gateway.lookup_display_name(user_id).await;
        let (status, ttl) = match kind {
            AwayKind::Afk => (
                replies::afk_status(&name, &text),
                minutes.map_or_else(|| seconds_until_next_day_boundary(now), minutes_to_secs),
            ),
            AwayKind::Lunch => (
                replies::lunch_status(&name, &text),
                minutes_to_secs(minutes.unwrap_or(DEFAULT_LUNCH_MINUTES)),
            ),
        };

        self.store.set_away(user_id, &status, ttl).await?;
        self.store.register_user(user_id).await?;
        self.update_status(user_id, &status, None).await?;

        Ok(replies::away_confirmation(&status, after_secs(now, ttl)))
    }

    async fn start(&self, user_id: &str) -> HandlerResult<String> {
        let now = self.clock.now();
        self.store.mark_started(user_id, now).await?;
        self.store
            .set(user_id, PresenceRecord::fresh(now), 0)
            .await?;

        Ok(replies::started(now))
    }

    async fn finish(&self, user_id: &str, text: &str) -> HandlerResult<String> {
        let now = self.clock.now();
        let name = self.gateway.lookup_display_name(user_id).await;
        let status = replies::finish_status(&name, text);
        let clears_at = next_day_boundary(now);

        self.store
            .set_away(user_id, &status, seconds_until(now, clears_at))
            .await?;
        self.store.register_user(user_id).await?;

        let started_at = self.store.started_at(user_id).await?;
        self.update_status(user_id, &status, Some(now)).await?;

        let closing = self.closing_line(now).await?;
        Ok(replies::finished(&closing, started_at, clears_at))
    }

    async fn comeback(&self, user_id: &str) -> HandlerResult<String> {
        let was_away = self.store.clear_away(user_id).await?;
        tracing::debug!(user_id = %user_id, was_away, "Away flag cleared");
        Ok(replies::welcome_back(user_id))
    }

    async fn toggle_auto_reply(&self, channel_id: &str, enabled: bool) -> HandlerResult<String> {
        let config = if enabled {
            ChannelConfig::enabled()
        } else {
            ChannelConfig::disabled()
        };
        self.store.set_channel_config(channel_id, config).await?;
        Ok(replies::auto_reply_toggled(enabled))
    }

    /// Copy the away status into the presence record, optionally closing the day
    async fn update_status(
        &self,
        user_id: &str,
        status: &str,
        finished_at: Option<DateTime<Local>>,
    ) -> HandlerResult<()> {
        let mut record = self.store.get(user_id).await?;
        record.status_message = status.to_string();
        if let Some(at) = finished_at {
            record.finish(at);
        }
        self.store.set(user_id, record, 0).await?;
        Ok(())
    }

    async fn closing_line(&self, now: DateTime<Local>) -> HandlerResult<String> {
        if let Some(daily) = self.store.daily_finish_message(now.date_naive()).await? {
            return Ok(format!("{daily}\n"));
        }
        Ok(self
            .finish_message
            .clone()
            .unwrap_or_else(|| replies::DEFAULT_FINISH_MESSAGE.to_string()))
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

fn after_secs(now: DateTime<Local>, secs: u64) -> DateTime<Local> {
    now + Duration::seconds(secs as i64)
}
