//! # afk-cache
//!
//! Storage layer for presence records, away flags, and channel settings.
//!
//! ## Features
//!
//! - **Backends**: a small [`KeyValueBackend`] port with a Redis implementation
//!   (deadpool-redis) and a process-local one for development and tests
//! - **Presence store**: typed get/set with legacy-key migration and start-time merging
//!
//! ## Example
//!
//! ```ignore
//! use afk_cache::{PresenceStore, RedisPool, RedisPoolConfig};
//! use afk_core::SystemClock;
//! use std::sync::Arc;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = PresenceStore::new(Arc::new(pool), Arc::new(SystemClock));
//!
//! store.set_away("U123", "alice is away", 3600).await?;
//! let record = store.get("U123").await?;
//! ```

pub mod backend;
pub mod error;
pub mod pool;
pub mod presence;

// Re-export backend types
pub use backend::{KeyValueBackend, MemoryBackend};

// Re-export error types
pub use error::{StoreError, StoreResult};

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig};

// Re-export presence types
pub use presence::{PresenceStore, REGISTERED_KEY};
