//! Session Integration Tests
//!
//! Drive a real `SessionManager` against a local websocket server. No Slack or Redis
//! needed.
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::time::{Duration, Instant};

use afk_common::SessionSettings;
use afk_gateway::{SessionConfig, SessionState};
use integration_tests::{
    disconnect_frame, hello_frame, slash_command_frame, Harness, MockSocketServer, StaticOpener,
};
use serde_json::json;

// ============================================================================
// Frames over the wire
// ============================================================================

#[tokio::test]
async fn test_command_is_acked_and_handled() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let harness = Harness::new(StaticOpener::new(&server.url));
    harness.gateway.add_name("U1", "alice");
    harness.session.start();

    let mut conn = server.accept().await?;
    conn.send_json(&hello_frame()).await?;
    conn.send_json(&slash_command_frame("env-1", "/afk", "in a meeting", "C1", "U1"))
        .await?;

    assert_eq!(conn.next_json().await?, json!({"envelope_id": "env-1"}));

    let posts = harness.gateway.wait_for_posts(1).await?;
    assert_eq!(posts[0].channel, "C1");
    assert_eq!(
        harness.store.away_message("U1").await?.as_deref(),
        Some("alice is away: in a meeting")
    );
    assert_eq!(harness.session.state(), SessionState::Connected);

    harness.session.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_liveness_and_garbage_frames_are_not_acked() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let harness = Harness::new(StaticOpener::new(&server.url));
    harness.session.start();

    let mut conn = server.accept().await?;
    conn.send_text("Ping from wss-primary.slack.com").await?;
    conn.send_text("{broken").await?;
    conn.send_json(&slash_command_frame("env-2", "/comeback", "", "C1", "U1"))
        .await?;

    // The first frame the bot writes is the ack for the valid envelope
    assert_eq!(conn.next_json().await?, json!({"envelope_id": "env-2"}));

    harness.session.stop().await;
    Ok(())
}

// ============================================================================
// Reconnection
// ============================================================================

#[tokio::test]
async fn test_disconnect_envelope_reconnects() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let opener = StaticOpener::new(&server.url);
    let harness = Harness::new(opener.clone());
    harness.session.start();

    let mut first = server.accept().await?;
    first.send_json(&hello_frame()).await?;
    first.send_json(&disconnect_frame("refresh_requested")).await?;
    first.closed().await?;

    let mut second = server.accept().await?;
    second.send_json(&hello_frame()).await?;
    second
        .send_json(&slash_command_frame("env-3", "/start", "", "C1", "U1"))
        .await?;
    assert_eq!(second.next_json().await?, json!({"envelope_id": "env-3"}));

    assert_eq!(opener.calls(), 2);
    assert_eq!(harness.session.connection_count(), 2);

    harness.session.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_server_close_reconnects() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let harness = Harness::new(StaticOpener::new(&server.url));
    harness.session.start();

    let first = server.accept().await?;
    first.close().await;

    let mut second = server.accept().await?;
    second
        .send_json(&slash_command_frame("env-4", "/afk", "", "C1", "U1"))
        .await?;
    assert_eq!(second.next_json().await?, json!({"envelope_id": "env-4"}));

    harness.session.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_failed_handshakes_retry_until_success() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let opener = StaticOpener::new(&server.url);
    opener.set_failing(true);
    let harness = Harness::new(opener.clone());
    harness.session.start();

    while opener.calls() < 3 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    opener.set_failing(false);

    let _conn = server.accept().await?;
    assert!(opener.calls() >= 4);
    assert_eq!(harness.session.connection_count(), 1);

    harness.session.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_backoff_resets_after_successful_connection() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let opener = StaticOpener::new(&server.url);
    opener.set_failing(true);
    let config = SessionConfig::from(&SessionSettings {
        keepalive_interval: Duration::from_secs(3600),
        reconnect_initial: Duration::from_millis(200),
        reconnect_max: Duration::from_secs(5),
    });
    let harness = Harness::with_config(opener.clone(), config);
    harness.session.start();

    // Failures back off 200ms, then 400ms; the attempt 800ms later connects
    while opener.calls() < 3 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    opener.set_failing(false);
    let first = server.accept().await?;

    let times = opener.call_times();
    assert_eq!(times.len(), 4);
    assert!(times[3] - times[2] >= Duration::from_millis(800));

    let dropped_at = Instant::now();
    first.close().await;
    let _second = server.accept().await?;

    // Back to the initial delay, not the 1600ms the failure streak had reached
    let gap = opener.call_times()[4] - dropped_at;
    assert!(gap >= Duration::from_millis(200), "gap was {gap:?}");
    assert!(gap < Duration::from_millis(1200), "gap was {gap:?}");
    assert_eq!(harness.session.connection_count(), 2);

    harness.session.stop().await;
    Ok(())
}

// ============================================================================
// Keepalive and shutdown
// ============================================================================

#[tokio::test]
async fn test_keepalive_pings() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let config = SessionConfig::from(&SessionSettings {
        keepalive_interval: Duration::from_millis(50),
        ..SessionSettings::default()
    });
    let harness = Harness::with_config(StaticOpener::new(&server.url), config);
    harness.session.start();

    let mut conn = server.accept().await?;
    conn.next_ping().await?;
    conn.next_ping().await?;

    harness.session.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_stop_closes_and_does_not_reconnect() -> anyhow::Result<()> {
    let mut server = MockSocketServer::start().await?;
    let opener = StaticOpener::new(&server.url);
    let harness = Harness::new(opener.clone());
    harness.session.start();

    let mut conn = server.accept().await?;
    harness.session.stop().await;
    conn.closed().await?;
    assert_eq!(harness.session.state(), SessionState::Disconnected);

    // Idempotent, and nothing reconnects afterwards
    harness.session.stop().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(opener.calls(), 1);
    Ok(())
}
