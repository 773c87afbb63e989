//! Presence storage
//!
//! Away flags, presence records, channel settings, and the registered-user list.

mod store;

pub use store::{PresenceStore, REGISTERED_KEY};
