//! Permit and cooldown markers in Redis.
//!
//! Both records are bare keys with an expiry; presence of the key is the record.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use linkguard_core::entities::{Cooldown, Permit};
use linkguard_core::traits::{EphemeralStore, RepoResult};

use crate::pool::RedisPool;

/// Key prefix for permits
const PERMIT_PREFIX: &str = "permit:";
/// Key prefix for channel cooldowns
const COOLDOWN_PREFIX: &str = "cooldown:";

/// Redis-backed ephemeral store
#[derive(Clone)]
pub struct RedisEphemeralStore {
    pool: RedisPool,
}

impl RedisEphemeralStore {
    /// Create a new ephemeral store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for a permit
    fn permit_key(permit: &Permit) -> String {
        format!("{PERMIT_PREFIX}{}:{}", permit.channel, permit.user)
    }

    /// Generate Redis key for a cooldown
    fn cooldown_key(cooldown: &Cooldown) -> String {
        format!("{COOLDOWN_PREFIX}{}", cooldown.channel)
    }
}

#[async_trait]
impl EphemeralStore for RedisEphemeralStore {
    #[instrument(skip(self))]
    async fn put_permit(&self, permit: &Permit, ttl: Duration) -> RepoResult<()> {
        self.pool.set_marker(&Self::permit_key(permit), ttl).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn has_permit(&self, permit: &Permit) -> RepoResult<bool> {
        Ok(self.pool.exists(&Self::permit_key(permit)).await?)
    }

    #[instrument(skip(self))]
    async fn put_cooldown(&self, cooldown: &Cooldown, ttl: Duration) -> RepoResult<()> {
        self.pool
            .set_marker(&Self::cooldown_key(cooldown), ttl)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn has_cooldown(&self, cooldown: &Cooldown) -> RepoResult<bool> {
        Ok(self.pool.exists(&Self::cooldown_key(cooldown)).await?)
    }
}
