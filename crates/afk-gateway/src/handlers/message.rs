//! Message events: auto-reply to mentions of away users

use super::{replies, HandlerResult};
use crate::protocol::MessageEvent;
use afk_cache::PresenceStore;
use afk_core::{MentionRecord, MessagingGateway};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

/// Messages from karma bots mention users without addressing them
static KARMA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+\+|is up to [0-9]+ points!").expect("karma pattern is valid")
});

const IGNORED_SUBTYPES: [&str; 2] = ["bot_message", "channel_join"];

/// Handles `message` and `app_mention` events
pub struct MessageHandler {
    store: PresenceStore,
    gateway: Arc<dyn MessagingGateway>,
}

impl MessageHandler {
    pub fn new(store: PresenceStore, gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { store, gateway }
    }

    /// Reply on behalf of every away user mentioned in the message
    ///
    /// Returns the number of auto-replies posted. A failure for one mentioned user is
    /// logged and does not stop the others.
    pub async fn handle(&self, event: &MessageEvent) -> HandlerResult<usize> {
        if let Some(reason) = skip_reason(event) {
            tracing::trace!(channel = %event.channel, ts = %event.ts, reason, "Message skipped");
            return Ok(0);
        }

        let mentioned = self.mentioned_users(event.text()).await?;
        if mentioned.is_empty() {
            return Ok(0);
        }

        let mut replied = 0;
        for user_id in &mentioned {
            match self.reply_for(user_id, event).await {
                Ok(true) => replied += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        channel = %event.channel,
                        error = %e,
                        "Auto-reply failed"
                    );
                }
            }
        }

        Ok(replied)
    }

    /// Registered users whose mention token appears in `text`, in registration order
    async fn mentioned_users(&self, text: &str) -> HandlerResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .store
            .registered_users()
            .await?
            .into_iter()
            .filter(|user_id| text.contains(&format!("<@{user_id}>")))
            .filter(|user_id| seen.insert(user_id.clone()))
            .collect())
    }

    async fn reply_for(&self, user_id: &str, event: &MessageEvent) -> HandlerResult<bool> {
        let Some(away_message) = self.store.away_message(user_id).await? else {
            return Ok(false);
        };

        let config = self.store.channel_config(&event.channel).await?;
        if !config.auto_reply_enabled {
            tracing::debug!(
                user_id = %user_id,
                channel = %event.channel,
                "Auto-reply disabled in channel"
            );
            return Ok(false);
        }

        let mention = MentionRecord::stripped(
            user_id,
            &event.channel,
            event.user.as_deref().unwrap_or_default(),
            event.text(),
            &event.ts,
        );
        self.store.append_mention(user_id, mention).await?;

        self.gateway
            .post(
                &event.channel,
                &replies::auto_reply(&away_message),
                Some(event.reply_thread()),
            )
            .await?;

        tracing::debug!(user_id = %user_id, channel = %event.channel, "Auto-reply posted");
        Ok(true)
    }
}

fn skip_reason(event: &MessageEvent) -> Option<&'static str> {
    if event
        .subtype
        .as_deref()
        .is_some_and(|subtype| IGNORED_SUBTYPES.contains(&subtype))
    {
        return Some("subtype");
    }
    if KARMA_PATTERN.is_match(event.text()) {
        return Some("karma");
    }
    None
}
