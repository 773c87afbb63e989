//! Bot Behavior Tests
//!
//! Feed whole Socket Mode frames through the session's frame handler and check acks,
//! replies, and store state. Runs offline on the in-memory store.
//!
//! Run with: cargo test -p integration-tests --test bot_tests

use afk_cache::KeyValueBackend;
use afk_core::ChannelConfig;
use afk_gateway::{FrameOutcome, OutboundFrame};
use integration_tests::{at, message_frame, slash_command_frame, Harness};
use serde_json::Value;
use tokio::sync::mpsc;

fn outbound() -> (mpsc::Sender<OutboundFrame>, mpsc::Receiver<OutboundFrame>) {
    mpsc::channel(32)
}

fn drain(rx: &mut mpsc::Receiver<OutboundFrame>) -> Vec<OutboundFrame> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

async fn feed(harness: &Harness, frame: &Value, tx: &mpsc::Sender<OutboundFrame>) -> FrameOutcome {
    harness.session.handle_frame(&frame.to_string(), tx).await
}

// ============================================================================
// Acknowledgment
// ============================================================================

#[tokio::test]
async fn test_every_envelope_acked_exactly_once() {
    let harness = Harness::offline();
    let (tx, mut rx) = outbound();

    feed(&harness, &slash_command_frame("a1", "/afk", "", "C1", "U1"), &tx).await;
    feed(&harness, &slash_command_frame("a2", "/no_such", "", "C1", "U1"), &tx).await;
    feed(&harness, &message_frame("a3", "C1", "U2", "<@U1> hi", "1.0"), &tx).await;

    assert_eq!(
        drain(&mut rx),
        [
            OutboundFrame::ack("a1"),
            OutboundFrame::ack("a2"),
            OutboundFrame::ack("a3"),
        ]
    );
}

#[tokio::test]
async fn test_decode_failure_does_not_affect_next_frame() {
    let harness = Harness::offline();
    let (tx, mut rx) = outbound();

    assert_eq!(
        harness.session.handle_frame(r#"{"type": "events_api", "#, &tx).await,
        FrameOutcome::Malformed
    );
    assert_eq!(
        feed(&harness, &slash_command_frame("b1", "/afk", "", "C1", "U1"), &tx).await,
        FrameOutcome::Dispatched
    );

    assert_eq!(drain(&mut rx), [OutboundFrame::ack("b1")]);
    assert!(harness.store.away_message("U1").await.unwrap().is_some());
}

// ============================================================================
// Mentions
// ============================================================================

#[tokio::test]
async fn test_two_away_users_each_get_a_reply_and_a_history_entry() {
    let harness = Harness::offline();
    harness.gateway.add_name("U1", "alice");
    harness.gateway.add_name("U2", "bob");
    let (tx, _rx) = outbound();

    feed(&harness, &slash_command_frame("c1", "/afk", "offsite", "C9", "U1"), &tx).await;
    feed(&harness, &slash_command_frame("c2", "/lunch", "", "C9", "U2"), &tx).await;
    let before = harness.gateway.posts().len();

    feed(
        &harness,
        &message_frame("c3", "C1", "U3", "<@U1> <@U2> can you review?", "1700000000.1"),
        &tx,
    )
    .await;

    let posts = harness.gateway.posts();
    let replies = &posts[before..];
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].text, "Auto-reply: alice is away: offsite");
    assert!(replies[1].text.starts_with("Auto-reply: bob is out for lunch"));
    assert!(replies
        .iter()
        .all(|p| p.channel == "C1" && p.thread_ts.as_deref() == Some("1700000000.1")));

    let alice = harness.store.get("U1").await.unwrap();
    assert_eq!(alice.mentions.len(), 1);
    assert_eq!(alice.mentions[0].text, " <@U2> can you review?");
    let bob = harness.store.get("U2").await.unwrap();
    assert_eq!(bob.mentions.len(), 1);
    assert_eq!(bob.mentions[0].text, "<@U1>  can you review?");
}

#[tokio::test]
async fn test_disabled_channel_gets_no_reply_and_no_history() {
    let harness = Harness::offline();
    let (tx, _rx) = outbound();

    harness.store.set_away("U1", "alice is away", 600).await.unwrap();
    harness.store.register_user("U1").await.unwrap();
    harness
        .store
        .set_channel_config("C1", ChannelConfig::disabled())
        .await
        .unwrap();

    feed(&harness, &message_frame("d1", "C1", "U2", "<@U1> ping", "2.0"), &tx).await;

    assert!(harness.gateway.posts().is_empty());
    assert!(harness.backend.get("U1-store").await.unwrap().is_none());
}

#[tokio::test]
async fn test_disable_afk_command_silences_channel() {
    let harness = Harness::offline();
    let (tx, _rx) = outbound();

    feed(&harness, &slash_command_frame("e1", "/afk", "", "C1", "U1"), &tx).await;
    feed(&harness, &slash_command_frame("e2", "/disable_afk", "", "C1", "U2"), &tx).await;
    let before = harness.gateway.posts().len();

    feed(&harness, &message_frame("e3", "C1", "U2", "<@U1> there?", "3.0"), &tx).await;
    assert_eq!(harness.gateway.posts().len(), before);

    feed(&harness, &message_frame("e4", "C2", "U2", "<@U1> there?", "4.0"), &tx).await;
    assert_eq!(harness.gateway.posts().len(), before + 1);
}

// ============================================================================
// Working day
// ============================================================================

#[tokio::test]
async fn test_finish_without_start_has_no_start_time() {
    let harness = Harness::offline();
    harness.clock.set(at(18, 0));
    let (tx, _rx) = outbound();

    feed(&harness, &slash_command_frame("f1", "/finish", "", "C1", "U1"), &tx).await;

    let reply = &harness.gateway.posts()[0].text;
    assert!(!reply.contains("Started at"));
    assert!(reply.contains("09:00 tomorrow"));
}

#[tokio::test]
async fn test_finish_after_start_reports_start_time() {
    let harness = Harness::offline();
    let (tx, _rx) = outbound();

    harness.clock.set(at(9, 0));
    feed(&harness, &slash_command_frame("g1", "/start", "", "C1", "U1"), &tx).await;
    harness.clock.set(at(17, 45));
    feed(&harness, &slash_command_frame("g2", "/afk_end", "", "C1", "U1"), &tx).await;

    let posts = harness.gateway.posts();
    assert_eq!(posts[0].text, "Good morning! Started at 09:00.");
    assert!(posts[1].text.contains("Started at 09:00"));

    let record = harness.store.get("U1").await.unwrap();
    assert_eq!(record.begin_time, Some(at(9, 0)));
    assert_eq!(record.end_time, Some(at(17, 45)));
}

#[tokio::test]
async fn test_unknown_command_changes_nothing() {
    let harness = Harness::offline();
    let (tx, mut rx) = outbound();

    let outcome = feed(&harness, &slash_command_frame("h1", "/dance", "now", "C1", "U1"), &tx).await;

    assert_eq!(outcome, FrameOutcome::Dispatched);
    assert_eq!(drain(&mut rx), [OutboundFrame::ack("h1")]);
    assert!(harness.gateway.posts().is_empty());
    assert!(harness.backend.is_empty());
}
