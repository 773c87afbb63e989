//! Redis Store Tests
//!
//! These tests require:
//! - Running Redis instance
//! - Environment variable: REDIS_URL
//!
//! Run with: cargo test -p integration-tests --test redis_tests

use std::sync::Arc;

use afk_cache::{KeyValueBackend, PresenceStore};
use afk_core::{ChannelConfig, FixedClock, MentionRecord, PresenceRecord};
use integration_tests::{at, redis_from_env, unique_suffix};

fn test_user() -> String {
    format!("UTEST{}-{}", std::process::id(), unique_suffix())
}

#[tokio::test]
async fn test_presence_record_round_trip() {
    let Some(pool) = redis_from_env().await else {
        return;
    };
    let backend = Arc::new(pool);
    let clock = FixedClock::new(at(9, 30));
    let store = PresenceStore::new(backend.clone(), Arc::new(clock.clone()));
    let user = test_user();

    backend
        .set(&format!("{user}-presence"), "{}", Some(60))
        .await
        .unwrap();
    store
        .set(&user, PresenceRecord::fresh(at(9, 30)), 60)
        .await
        .unwrap();
    store
        .append_mention(&user, MentionRecord::stripped(&user, "C1", "U2", "hello", "1.0"))
        .await
        .unwrap();

    clock.set(at(12, 0));
    let record = store.get(&user).await.unwrap();
    assert_eq!(record.begin_time, Some(at(9, 30)));
    assert_eq!(record.mentions.len(), 1);
    assert!(backend
        .get(&format!("{user}-presence"))
        .await
        .unwrap()
        .is_none());

    backend.delete(&format!("{user}-store")).await.unwrap();
}

#[tokio::test]
async fn test_away_flag_and_channel_config() {
    let Some(pool) = redis_from_env().await else {
        return;
    };
    let store = PresenceStore::new(Arc::new(pool), Arc::new(FixedClock::new(at(10, 0))));
    let user = test_user();
    let channel = format!("C{user}");

    store.set_away(&user, "away", 60).await.unwrap();
    assert_eq!(store.away_message(&user).await.unwrap().as_deref(), Some("away"));
    assert!(store.clear_away(&user).await.unwrap());
    assert!(store.away_message(&user).await.unwrap().is_none());

    assert!(store.channel_config(&channel).await.unwrap().auto_reply_enabled);
    store
        .set_channel_config(&channel, ChannelConfig::disabled())
        .await
        .unwrap();
    assert!(!store.channel_config(&channel).await.unwrap().auto_reply_enabled);
}
