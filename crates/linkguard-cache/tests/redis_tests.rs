//! Integration tests for the Redis cache tier
//!
//! These tests require a running Redis server.
//! Set REDIS_URL environment variable before running:
//!
//! ```bash
//! export REDIS_URL="redis://127.0.0.1:6379"
//! cargo test -p linkguard-cache --test redis_tests
//! ```

use std::time::Duration;

use linkguard_cache::{RedisChannelConfigCache, RedisEphemeralStore, RedisPool, RedisPoolConfig};
use linkguard_core::entities::{ChannelConfig, Cooldown, Permit, Role};
use linkguard_core::traits::{ChannelConfigCache, EphemeralStore};

/// Helper to create a pool against a reachable Redis
async fn get_test_pool() -> Option<RedisPool> {
    let url = std::env::var("REDIS_URL").ok()?;
    let pool = RedisPool::new(RedisPoolConfig {
        url,
        max_connections: 4,
    })
    .ok()?;
    pool.health_check().await.ok()?;
    Some(pool)
}

fn test_channel_name(prefix: &str) -> String {
    format!("{}_{}", prefix, std::process::id())
}

#[tokio::test]
async fn test_config_set_get_remove() {
    let Some(pool) = get_test_pool().await else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let cache = RedisChannelConfigCache::new(pool);
    let name = test_channel_name("cfg");

    let mut config = ChannelConfig::with_defaults(&name);
    config.minimum_exempt_role = Role::Moderator;
    config.allow(["zeta.com", "alpha.com", "*:clips"]);

    cache.set(&config, Duration::from_secs(60)).await.unwrap();
    let cached = cache.get(&name).await.unwrap().unwrap();
    assert_eq!(cached, config);

    // Overwrite with an empty allow list
    let empty = ChannelConfig::with_defaults(&name);
    cache.set(&empty, Duration::from_secs(60)).await.unwrap();
    assert_eq!(cache.get(&name).await.unwrap().unwrap(), empty);

    cache.remove(&name).await.unwrap();
    assert!(cache.get(&name).await.unwrap().is_none());
}

#[tokio::test]
async fn test_permit_and_cooldown_markers() {
    let Some(pool) = get_test_pool().await else {
        eprintln!("Skipping test: REDIS_URL not set");
        return;
    };

    let store = RedisEphemeralStore::new(pool);
    let channel = test_channel_name("eph");
    let permit = Permit::new(&channel, "bob");
    let cooldown = Cooldown::new(&channel);

    store
        .put_permit(&permit, Duration::from_secs(1))
        .await
        .unwrap();
    store
        .put_cooldown(&cooldown, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store.has_permit(&permit).await.unwrap());
    assert!(!store
        .has_permit(&Permit::new(&channel, "alice"))
        .await
        .unwrap());
    assert!(store.has_cooldown(&cooldown).await.unwrap());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!store.has_permit(&permit).await.unwrap());
    assert!(!store.has_cooldown(&cooldown).await.unwrap());
}
