//! Presence store.
//!
//! Sole owner of every key the bot writes:
//!
//! | Key | Value |
//! |---|---|
//! | `<uid>` | away message (TTL) |
//! | `<uid>-store` | presence record JSON |
//! | `<uid>-presence` | legacy record, removed on read |
//! | `<uid>-begin` | time of the last `start` (RFC 3339) |
//! | `<cid>-channel` | channel settings JSON |
//! | `registered` | list of user ids that have gone away |
//! | `finish_<YYYY-MM-DD>` | closing line for that day's `finish` replies (set by operators) |
//!
//! Read-modify-write sequences are not atomic; concurrent writers race last-writer-wins.

use afk_core::{ChannelConfig, Clock, MentionRecord, PresenceRecord};
use chrono::{DateTime, Local, NaiveDate};
use std::sync::Arc;

use crate::backend::KeyValueBackend;
use crate::error::StoreResult;

/// Key of the list of users that have ever set an away flag
pub const REGISTERED_KEY: &str = "registered";

const RECORD_SUFFIX: &str = "-store";
const LEGACY_RECORD_SUFFIX: &str = "-presence";
const BEGIN_SUFFIX: &str = "-begin";
const CHANNEL_SUFFIX: &str = "-channel";

/// Typed access to presence state
#[derive(Clone)]
pub struct PresenceStore {
    backend: Arc<dyn KeyValueBackend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PresenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceStore").finish_non_exhaustive()
    }
}

impl PresenceStore {
    /// Create a new presence store
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    fn record_key(user_id: &str) -> String {
        format!("{user_id}{RECORD_SUFFIX}")
    }

    fn legacy_record_key(user_id: &str) -> String {
        format!("{user_id}{LEGACY_RECORD_SUFFIX}")
    }

    fn begin_key(user_id: &str) -> String {
        format!("{user_id}{BEGIN_SUFFIX}")
    }

    fn channel_key(channel_id: &str) -> String {
        format!("{channel_id}{CHANNEL_SUFFIX}")
    }

    fn finish_message_key(date: NaiveDate) -> String {
        format!("finish_{}", date.format("%Y-%m-%d"))
    }

    // =========================================================================
    // Presence records
    // =========================================================================

    /// Read a user's presence record
    ///
    /// Deletes the legacy-format key as a side effect. A missing or unreadable record
    /// yields a fresh one starting now.
    pub async fn get(&self, user_id: &str) -> StoreResult<PresenceRecord> {
        let raw = self.backend.get(&Self::record_key(user_id)).await?;

        if let Err(e) = self.backend.delete(&Self::legacy_record_key(user_id)).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to remove legacy presence key");
        }

        let Some(raw) = raw else {
            return Ok(PresenceRecord::fresh(self.clock.now()));
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Unreadable presence record, starting fresh"
                );
                Ok(PresenceRecord::fresh(self.clock.now()))
            }
        }
    }

    /// Write a user's presence record
    ///
    /// `begin_time` is taken from the start marker when one exists; otherwise a record
    /// written without one keeps the stored value. `ttl_seconds == 0` persists the key.
    pub async fn set(
        &self,
        user_id: &str,
        mut record: PresenceRecord,
        ttl_seconds: u64,
    ) -> StoreResult<()> {
        let key = Self::record_key(user_id);

        if let Some(started) = self.started_at(user_id).await? {
            record.begin_time = Some(started);
        } else if record.begin_time.is_none() {
            if let Some(raw) = self.backend.get(&key).await? {
                if let Ok(existing) = serde_json::from_str::<PresenceRecord>(&raw) {
                    record.begin_time = existing.begin_time;
                }
            }
        }

        let json = serde_json::to_string(&record)?;
        self.backend.set(&key, &json, None).await?;
        if ttl_seconds > 0 {
            self.backend.expire(&key, ttl_seconds).await?;
        }

        tracing::debug!(
            user_id = %user_id,
            mentions = record.mentions.len(),
            ttl = ttl_seconds,
            "Stored presence record"
        );

        Ok(())
    }

    /// Append a mention to a user's history
    pub async fn append_mention(&self, user_id: &str, mention: MentionRecord) -> StoreResult<()> {
        let mut record = self.get(user_id).await?;
        record.push_mention(mention);
        self.set(user_id, record, 0).await
    }

    // =========================================================================
    // Start marker
    // =========================================================================

    /// Record the start of the working day
    pub async fn mark_started(&self, user_id: &str, at: DateTime<Local>) -> StoreResult<()> {
        self.backend
            .set(&Self::begin_key(user_id), &at.to_rfc3339(), None)
            .await
    }

    /// Time of the last `start`, if any
    pub async fn started_at(&self, user_id: &str) -> StoreResult<Option<DateTime<Local>>> {
        let Some(raw) = self.backend.get(&Self::begin_key(user_id)).await? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Ok(Some(at.with_timezone(&Local))),
            Err(e) => {
                tracing::warn!(user_id = %user_id, value = %raw, error = %e, "Ignoring unparsable start marker");
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Away flags
    // =========================================================================

    /// The user's away message; `None` means the user is not away
    pub async fn away_message(&self, user_id: &str) -> StoreResult<Option<String>> {
        self.backend.get(user_id).await
    }

    /// Mark a user away until `ttl_seconds` from now
    pub async fn set_away(&self, user_id: &str, message: &str, ttl_seconds: u64) -> StoreResult<()> {
        self.backend.set(user_id, message, Some(ttl_seconds)).await?;

        tracing::debug!(user_id = %user_id, ttl = ttl_seconds, "Set away flag");
        Ok(())
    }

    /// Clear a user's away flag, returning whether one was set
    pub async fn clear_away(&self, user_id: &str) -> StoreResult<bool> {
        self.backend.delete(user_id).await
    }

    /// Operator-provided closing line for `finish` on the given day
    pub async fn daily_finish_message(&self, date: NaiveDate) -> StoreResult<Option<String>> {
        let raw = self.backend.get(&Self::finish_message_key(date)).await?;
        Ok(raw.filter(|message| !message.trim().is_empty()))
    }

    // =========================================================================
    // Registered users
    // =========================================================================

    /// Every user id that has gone away at least once
    pub async fn registered_users(&self) -> StoreResult<Vec<String>> {
        self.backend.list_range(REGISTERED_KEY, 0, -1).await
    }

    /// Add a user to the registered list, returning `false` if already present
    pub async fn register_user(&self, user_id: &str) -> StoreResult<bool> {
        if self
            .registered_users()
            .await?
            .iter()
            .any(|id| id == user_id)
        {
            return Ok(false);
        }
        self.backend.list_push(REGISTERED_KEY, user_id).await?;
        Ok(true)
    }

    // =========================================================================
    // Channel settings
    // =========================================================================

    /// Settings of a channel; defaults (auto-reply on) when never configured
    pub async fn channel_config(&self, channel_id: &str) -> StoreResult<ChannelConfig> {
        let raw = self.backend.get(&Self::channel_key(channel_id)).await?;
        Ok(raw
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default())
    }

    pub async fn set_channel_config(
        &self,
        channel_id: &str,
        config: ChannelConfig,
    ) -> StoreResult<()> {
        let json = serde_json::to_string(&config)?;
        self.backend
            .set(&Self::channel_key(channel_id), &json, None)
            .await
    }
}
