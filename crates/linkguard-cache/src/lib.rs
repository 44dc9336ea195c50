//! # linkguard-cache
//!
//! Cache tier for channel configurations and the cache-only ephemeral records.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Channel Configs**: TTL-bounded mirror of the authoritative store
//! - **Ephemeral Records**: Permits and channel cooldowns that expire on their own
//! - **Memory Tier**: In-process implementation of both for running without Redis
//!
//! ## Example
//!
//! ```ignore
//! use linkguard_cache::{RedisChannelConfigCache, RedisEphemeralStore, RedisPool, RedisPoolConfig};
//!
//! // Create Redis pool
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//!
//! // Create stores
//! let configs = RedisChannelConfigCache::new(pool.clone());
//! let ephemeral = RedisEphemeralStore::new(pool);
//!
//! // Cache a channel for 30 minutes
//! configs.set(&config, Duration::from_secs(1800)).await?;
//! ```

pub mod config;
pub mod ephemeral;
pub mod memory;
pub mod pool;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

pub use config::RedisChannelConfigCache;
pub use ephemeral::RedisEphemeralStore;
pub use memory::MemoryCache;
