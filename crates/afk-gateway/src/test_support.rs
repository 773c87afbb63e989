//! Fakes shared by unit tests

use afk_cache::{MemoryBackend, PresenceStore};
use afk_core::{DomainError, DomainResult, FixedClock, MessagingGateway};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub channel: String,
    pub text: String,
    pub thread_ts: Option<String>,
}

/// Records every post; optionally fails them
#[derive(Default)]
pub struct RecordingGateway {
    posts: Mutex<Vec<Post>>,
    names: HashMap<String, String>,
    fail_posts: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, user_id: &str, name: &str) -> Self {
        self.names.insert(user_id.to_string(), name.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_posts: true,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn post(&self, channel: &str, text: &str, thread_ts: Option<&str>) -> DomainResult<()> {
        if self.fail_posts {
            return Err(DomainError::MessagingFailed("channel_not_found".into()));
        }
        self.posts.lock().push(Post {
            channel: channel.to_string(),
            text: text.to_string(),
            thread_ts: thread_ts.map(str::to_string),
        });
        Ok(())
    }

    async fn lookup_display_name(&self, user_id: &str) -> String {
        self.names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    }
}

pub fn at(h: u32, m: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
}

pub struct Fixture {
    pub store: PresenceStore,
    pub backend: Arc<MemoryBackend>,
    pub clock: FixedClock,
}

pub fn fixture_at(h: u32, m: u32) -> Fixture {
    let backend = Arc::new(MemoryBackend::new());
    let clock = FixedClock::new(at(h, m));
    let store = PresenceStore::new(backend.clone(), Arc::new(clock.clone()));
    Fixture {
        store,
        backend,
        clock,
    }
}
