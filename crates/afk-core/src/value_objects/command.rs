//! Slash commands understood by the bot

use std::fmt;

/// Lunch breaks clear after this many minutes unless told otherwise
pub const DEFAULT_LUNCH_MINUTES: u32 = 60;

/// Canonical command, after alias normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/afk`, or `/afk_<minutes>` with a built-in duration
    Afk { minutes: Option<u32> },
    /// `/lunch`
    Lunch,
    /// `/start`, `/afk_start`
    Start,
    /// `/finish`, `/end`, `/afk_end`
    Finish,
    /// `/comeback`
    Comeback,
    /// `/enable_afk`
    EnableAfk,
    /// `/disable_afk`
    DisableAfk,
    /// Anything else, kept for logging
    Unknown(String),
}

impl Command {
    /// Parse a slash command name such as `/afk_30`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim().trim_start_matches('/').to_ascii_lowercase();
        match name.as_str() {
            "afk" => Self::Afk { minutes: None },
            "lunch" => Self::Lunch,
            "start" | "afk_start" => Self::Start,
            "finish" | "end" | "afk_end" => Self::Finish,
            "comeback" => Self::Comeback,
            "enable_afk" => Self::EnableAfk,
            "disable_afk" => Self::DisableAfk,
            other => match other
                .strip_prefix("afk_")
                .and_then(|m| m.parse::<u32>().ok())
            {
                Some(minutes) => Self::Afk {
                    minutes: Some(minutes),
                },
                None => Self::Unknown(name),
            },
        }
    }

    /// Canonical command name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Afk { .. } => "afk",
            Self::Lunch => "lunch",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Comeback => "comeback",
            Self::EnableAfk => "enable_afk",
            Self::DisableAfk => "disable_afk",
            Self::Unknown(name) => name,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Afk {
                minutes: Some(minutes),
            } => write!(f, "afk_{minutes}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Free-text arguments of `/afk` and `/lunch`
///
/// `"30 in a meeting"` carries a duration in minutes followed by the message;
/// anything else is taken verbatim as the message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AwayArgs {
    pub minutes: Option<u32>,
    pub message: String,
}

impl AwayArgs {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some((head, rest)) = text.split_once(char::is_whitespace) {
            if !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(minutes) = head.parse() {
                    return Self {
                        minutes: Some(minutes),
                        message: rest.trim_start().to_string(),
                    };
                }
            }
        }
        Self {
            minutes: None,
            message: text.to_string(),
        }
    }
}
