//! In-process cache with per-entry expiry.
//!
//! Serves both the channel config cache and the ephemeral records when no
//! Redis is configured. Expiry is checked on read against the tokio clock, so
//! tests can drive it with paused time. `set_available(false)` makes every
//! call fail the way an unreachable Redis would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use linkguard_core::entities::{normalize_channel_name, ChannelConfig, Cooldown, Permit};
use linkguard_core::error::DomainError;
use linkguard_core::traits::{ChannelConfigCache, EphemeralStore, RepoResult};

#[derive(Debug, Clone)]
struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// In-memory cache tier
#[derive(Debug)]
pub struct MemoryCache {
    configs: DashMap<String, Expiring<ChannelConfig>>,
    permits: DashMap<Permit, Expiring<()>>,
    cooldowns: DashMap<Cooldown, Expiring<()>>,
    available: AtomicBool,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
            permits: DashMap::new(),
            cooldowns: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the cache going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Direct view of a cached config, bypassing availability
    pub fn peek(&self, name: &str) -> Option<ChannelConfig> {
        self.configs
            .get(&normalize_channel_name(name))
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone())
    }

    fn check(&self) -> RepoResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::CacheError("cache tier unavailable".to_string()))
        }
    }
}

/// Whether a live entry exists; an expired one is dropped
fn live<K, T>(map: &DashMap<K, Expiring<T>>, key: &K) -> bool
where
    K: std::hash::Hash + Eq,
{
    map.remove_if(key, |_, entry| !entry.is_live());
    map.contains_key(key)
}

#[async_trait]
impl ChannelConfigCache for MemoryCache {
    async fn get(&self, name: &str) -> RepoResult<Option<ChannelConfig>> {
        self.check()?;
        let name = normalize_channel_name(name);
        if !live(&self.configs, &name) {
            return Ok(None);
        }
        Ok(self.configs.get(&name).map(|entry| entry.value.clone()))
    }

    async fn set(&self, config: &ChannelConfig, ttl: Duration) -> RepoResult<()> {
        self.check()?;
        self.configs
            .insert(config.name.clone(), Expiring::new(config.clone(), ttl));
        Ok(())
    }

    async fn remove(&self, name: &str) -> RepoResult<()> {
        self.check()?;
        self.configs.remove(&normalize_channel_name(name));
        Ok(())
    }
}

#[async_trait]
impl EphemeralStore for MemoryCache {
    async fn put_permit(&self, permit: &Permit, ttl: Duration) -> RepoResult<()> {
        self.check()?;
        self.permits.insert(permit.clone(), Expiring::new((), ttl));
        Ok(())
    }

    async fn has_permit(&self, permit: &Permit) -> RepoResult<bool> {
        self.check()?;
        Ok(live(&self.permits, permit))
    }

    async fn put_cooldown(&self, cooldown: &Cooldown, ttl: Duration) -> RepoResult<()> {
        self.check()?;
        self.cooldowns
            .insert(cooldown.clone(), Expiring::new((), ttl));
        Ok(())
    }

    async fn has_cooldown(&self, cooldown: &Cooldown) -> RepoResult<bool> {
        self.check()?;
        Ok(live(&self.cooldowns, cooldown))
    }
}
