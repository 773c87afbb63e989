//! Slack Web API

mod api;

pub use api::{SlackApi, DEFAULT_API_BASE};
