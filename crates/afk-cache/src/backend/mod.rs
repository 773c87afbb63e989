//! Key-value backend port
//!
//! The presence store only needs string keys with optional per-key TTL and one list.
//! Redis is the production backend; [`MemoryBackend`] mirrors its semantics in-process.

mod memory;

pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::error::StoreResult;

#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read a string value
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a string value, replacing any previous value and TTL
    ///
    /// `Some(0)` is treated like `None`: the key persists.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Set a TTL on an existing key, returning whether the key existed
    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Append to the list at `key`, creating it if absent
    async fn list_push(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Read list elements `start..=stop`; negative indices count from the end
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;
}
