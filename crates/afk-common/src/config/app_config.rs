//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::fmt;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub slack: SlackConfig,
    pub store: StoreConfig,
    pub session: SessionSettings,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Closing line of the `finish` reply
    pub finish_message: Option<String>,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Slack credentials and endpoint
#[derive(Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-`), used for chat.postMessage and users.info
    pub bot_token: String,
    /// App-level token (`xapp-`), used for apps.connections.open
    pub app_token: String,
    /// Web API base URL
    pub api_base: String,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"<redacted>")
            .field("app_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Which key-value backend the presence store runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackendKind {
    #[default]
    Redis,
    /// Process-local, lost on restart. Useful for local runs.
    Memory,
}

/// Presence store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackendKind,
    pub redis: RedisConfig,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Socket session timings
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub keepalive_interval: Duration,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            keepalive_interval: Duration::from_secs(default_keepalive_secs()),
            reconnect_initial: Duration::from_secs(default_reconnect_initial_secs()),
            reconnect_max: Duration::from_secs(default_reconnect_max_secs()),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "slack-afk".to_string()
}

fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_max_connections() -> u32 {
    8
}

fn default_keepalive_secs() -> u64 {
    30
}

fn default_reconnect_initial_secs() -> u64 {
    2
}

fn default_reconnect_max_secs() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a Slack token is missing or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };
        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        let backend = match lookup("STORE_BACKEND") {
            None => StoreBackendKind::default(),
            Some(value) => match value.to_lowercase().as_str() {
                "redis" => StoreBackendKind::Redis,
                "memory" => StoreBackendKind::Memory,
                _ => return Err(ConfigError::InvalidValue("STORE_BACKEND", value)),
            },
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
                finish_message: lookup("AFK_FINISH_MESSAGE").filter(|v| !v.trim().is_empty()),
            },
            slack: SlackConfig {
                bot_token: required("SLACK_BOT_TOKEN")?,
                app_token: required("SLACK_APP_TOKEN")?,
                api_base: lookup("SLACK_API_BASE").unwrap_or_else(default_api_base),
            },
            store: StoreConfig {
                backend,
                redis: RedisConfig {
                    url: lookup("REDIS_URL").unwrap_or_else(default_redis_url),
                    max_connections: lookup("REDIS_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_redis_max_connections),
                },
            },
            session: SessionSettings {
                keepalive_interval: Duration::from_secs(secs(
                    "KEEPALIVE_INTERVAL_SECS",
                    default_keepalive_secs(),
                )),
                reconnect_initial: Duration::from_secs(secs(
                    "RECONNECT_INITIAL_SECS",
                    default_reconnect_initial_secs(),
                )),
                reconnect_max: Duration::from_secs(secs(
                    "RECONNECT_MAX_SECS",
                    default_reconnect_max_secs(),
                )),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
