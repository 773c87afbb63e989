//! Test fixtures and frame builders
//!
//! Frames mirror what Slack sends over a Socket Mode connection.

use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A local time on the fixed test day
pub fn at(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, 19, hour, minute, 0)
        .single()
        .expect("test time is unambiguous")
}

pub fn hello_frame() -> Value {
    json!({
        "type": "hello",
        "num_connections": 1,
        "connection_info": {"app_id": "A0TEST"}
    })
}

pub fn disconnect_frame(reason: &str) -> Value {
    json!({"type": "disconnect", "reason": reason})
}

pub fn slash_command_frame(envelope_id: &str, command: &str, text: &str, channel: &str, user: &str) -> Value {
    json!({
        "type": "slash_commands",
        "envelope_id": envelope_id,
        "accepts_response_payload": true,
        "payload": {
            "command": command,
            "text": text,
            "channel_id": channel,
            "user_id": user,
            "user_name": user.to_lowercase()
        }
    })
}

pub fn message_frame(envelope_id: &str, channel: &str, author: &str, text: &str, ts: &str) -> Value {
    json!({
        "type": "events_api",
        "envelope_id": envelope_id,
        "accepts_response_payload": false,
        "payload": {
            "type": "event_callback",
            "event": {
                "type": "message",
                "channel": channel,
                "user": author,
                "text": text,
                "ts": ts
            }
        }
    })
}
