//! Redis connection pool using deadpool-redis.
//!
//! Provides a managed pool of Redis connections for efficient resource usage.

use deadpool_redis::{Config, Pool, Runtime};
use linkguard_core::error::DomainError;
use redis::AsyncCommands;
use std::time::Duration;

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
            max_connections: 16,
        }
    }
}

impl From<&linkguard_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &linkguard_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

/// Error type for Redis pool operations
#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Failed to get connection from pool: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for Redis pool operations
pub type RedisResult<T> = Result<T, RedisPoolError>;

impl From<RedisPoolError> for DomainError {
    fn from(e: RedisPoolError) -> Self {
        DomainError::CacheError(e.to_string())
    }
}

/// Whole seconds for a Redis TTL, never below one
pub(crate) fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
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
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::CreatePool(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        tracing::info!(
            url = %safe_url,
            max_connections = config.max_connections,
            "Redis pool created"
        );

        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(RedisPoolError::GetConnection)
    }

    /// Check if the pool is healthy by pinging Redis
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await?;
        Ok(())
    }

    /// Set a marker key that expires after `ttl`
    pub async fn set_marker(&self, key: &str, ttl: Duration) -> RedisResult<()> {
        let mut conn = self.get().await?;
        conn.set_ex::<_, _, ()>(key, 1, ttl_seconds(ttl)).await?;
        Ok(())
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.get().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Delete multiple keys
    pub async fn delete_many(&self, keys: &[&str]) -> RedisResult<i32> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.get().await?;
        let deleted: i32 = conn.del(keys).await?;
        Ok(deleted)
    }
}
