//! Text the bot posts

use chrono::{DateTime, Local};

/// Closing line of `finish` when nothing else is configured
pub const DEFAULT_FINISH_MESSAGE: &str = "Good work today!";

const TIME_FORMAT: &str = "%H:%M";

/// Threaded auto-reply to a mention of an away user
pub fn auto_reply(away_message: &str) -> String {
    format!("Auto-reply: {away_message}")
}

/// Away flag set by `/afk`
pub fn afk_status(name: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{name} is away. Replies may be delayed.")
    } else {
        format!("{name} is away: {text}")
    }
}

/// Away flag set by `/lunch`
pub fn lunch_status(name: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{name} is out for lunch. Replies may be delayed.")
    } else {
        format!("{name} is out for lunch: {text}")
    }
}

/// Away flag set by `/finish`
pub fn finish_status(name: &str, text: &str) -> String {
    if text.is_empty() {
        format!("{name} has finished for the day. Replies may be delayed.")
    } else {
        format!("{name} has finished for the day: {text}")
    }
}

/// Confirmation for `/afk` and `/lunch`
pub fn away_confirmation(status: &str, until: DateTime<Local>) -> String {
    format!(
        "You are away until {}.\n> {status}",
        until.format("%m/%d %H:%M")
    )
}

pub fn started(at: DateTime<Local>) -> String {
    format!("Good morning! Started at {}.", at.format(TIME_FORMAT))
}

/// Reply to `/finish`
pub fn finished(
    closing: &str,
    started_at: Option<DateTime<Local>>,
    clears_at: DateTime<Local>,
) -> String {
    let mut reply = closing.to_string();
    if let Some(started_at) = started_at {
        reply.push_str(&format!("\nStarted at {}", started_at.format(TIME_FORMAT)));
    }
    reply.push_str(&format!(
        "\nAway status clears automatically at {} tomorrow.",
        clears_at.format(TIME_FORMAT)
    ));
    reply
}

pub fn welcome_back(user_id: &str) -> String {
    format!("Welcome back, <@{user_id}>!")
}

pub fn auto_reply_toggled(enabled: bool) -> String {
    if enabled {
        "Auto-reply is now enabled in this channel.".to_string()
    } else {
        "Auto-reply is now disabled in this channel.".to_string()
    }
}
