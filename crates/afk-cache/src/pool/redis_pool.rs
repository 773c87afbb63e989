//! Redis connection pool using deadpool-redis.
//!
//! Provides a managed pool of Redis connections and the production [`KeyValueBackend`].

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::backend::KeyValueBackend;
use crate::error::{StoreError, StoreResult};

/// Redis pool configuration
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 8,
        }
    }
}

impl From<&afk_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &afk_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool with the given configuration
    pub fn new(config: RedisPoolConfig) -> StoreResult<Self> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map_err(|e| StoreError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::CreatePool(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        tracing::info!(
            url = %safe_url,
            max_connections = config.max_connections,
            "Redis pool created"
        );

        Ok(Self { pool })
    }

    /// Create a new Redis pool from afk-common config
    pub fn from_config(config: &afk_common::RedisConfig) -> StoreResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Get a connection from the pool
    pub async fn connection(&self) -> StoreResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(StoreError::GetConnection)
    }

    /// Get the current pool status
    #[must_use]
    pub fn status(&self) -> deadpool_redis::Status {
        self.pool.status()
    }

    /// Check if the pool is healthy by pinging Redis
    pub async fn health_check(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

fn ttl_as_i64(ttl_seconds: u64) -> StoreResult<i64> {
    i64::try_from(ttl_seconds).map_err(|_| StoreError::TtlOutOfRange(ttl_seconds))
}

#[async_trait]
impl KeyValueBackend for RedisPool {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        let mut conn = self.connection().await?;

        match ttl_seconds.filter(|ttl| *ttl > 0) {
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(key, value, ttl).await?;
            }
            None => {
                conn.set::<_, _, ()>(key, value).await?;
            }
        }

        tracing::trace!(key = %key, ttl = ?ttl_seconds, "SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.connection().await?;
        let deleted: i32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let ttl = ttl_as_i64(ttl_seconds)?;
        let mut conn = self.connection().await?;
        let result: bool = conn.expire(key, ttl).await?;
        Ok(result)
    }

    async fn list_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        conn.rpush::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.connection().await?;
        let values: Vec<String> = conn.lrange(key, start, stop).await?;
        Ok(values)
    }
}
