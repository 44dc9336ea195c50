//! Channel configuration repository
//!
//! Cache-aside reads and write-through writes over the two tiers. The cache
//! tier is best effort: its failures are logged and routed around. The
//! authoritative tier is not: its write failures are returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use linkguard_core::entities::{normalize_channel_name, ChannelConfig};
use linkguard_core::traits::{ChannelConfigCache, ChannelConfigStore};

use super::error::{ServiceError, ServiceResult};

/// Unified read/write access to channel configurations
#[derive(Clone)]
pub struct ChannelConfigRepository {
    cache: Arc<dyn ChannelConfigCache>,
    store: Arc<dyn ChannelConfigStore>,
    ttl: Duration,
}

impl std::fmt::Debug for ChannelConfigRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfigRepository")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ChannelConfigRepository {
    pub fn new(
        cache: Arc<dyn ChannelConfigCache>,
        store: Arc<dyn ChannelConfigStore>,
        ttl: Duration,
    ) -> Self {
        Self { cache, store, ttl }
    }

    /// Cache first; on a miss read the store and populate the cache
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> ServiceResult<Option<ChannelConfig>> {
        let name = normalize_channel_name(name);

        match self.cache.get(&name).await {
            Ok(Some(config)) => return Ok(Some(config)),
            Ok(None) => {}
            Err(e) => warn!(channel = %name, error = %e, "Cache read failed, using store"),
        }

        let Some(config) = self.store.find_by_name(&name).await? else {
            return Ok(None);
        };

        if let Err(e) = self.cache.set(&config, self.ttl).await {
            warn!(channel = %name, error = %e, "Cache population failed");
        }

        Ok(Some(config))
    }

    /// Write both tiers; only a store failure is an error
    #[instrument(skip(self, config), fields(channel = %config.name))]
    pub async fn put(&self, config: &ChannelConfig) -> ServiceResult<()> {
        if let Err(e) = self.cache.set(config, self.ttl).await {
            warn!(channel = %config.name, error = %e, "Cache write failed");
        }

        if let Err(e) = self.store.upsert(config).await {
            // The cached copy must not outlive a write the store never saw
            if let Err(cache_err) = self.cache.remove(&config.name).await {
                warn!(channel = %config.name, error = %cache_err, "Cache rollback failed");
            }
            return Err(ServiceError::persistence(&config.name, e));
        }

        Ok(())
    }

    /// Remove from both tiers; only a store failure is an error
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> ServiceResult<()> {
        let name = normalize_channel_name(name);

        if let Err(e) = self.cache.remove(&name).await {
            warn!(channel = %name, error = %e, "Cache removal failed");
        }

        self.store
            .delete(&name)
            .await
            .map_err(|e| ServiceError::persistence(&name, e))
    }

    /// Distinct configured channel names, always from the store
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_names().await?)
    }
}
