//! Channel configuration cache in Redis.
//!
//! Each channel is kept as two keys sharing one TTL:
//! - `channel:<name>:config`: hash of the scalar settings plus `allow_count`
//! - `channel:<name>:allowlist`: sorted set of allow-list entries scored by position
//!
//! Both keys are written in one MULTI/EXEC so a reader never sees a
//! half-written entry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use linkguard_core::entities::{normalize_channel_name, ChannelConfig, Role};
use linkguard_core::traits::{ChannelConfigCache, RepoResult};

use crate::pool::{ttl_seconds, RedisPool, RedisResult};

/// Key prefix for channel entries
const CHANNEL_PREFIX: &str = "channel:";

const FIELD_NAME: &str = "name";
const FIELD_SLASH: &str = "slash";
const FIELD_DOT: &str = "dot";
const FIELD_SUBDOMAINS: &str = "subdomains";
const FIELD_USERLEVEL: &str = "userlevel";
const FIELD_REPLY: &str = "reply";
const FIELD_ALLOW_COUNT: &str = "allow_count";

/// Redis-backed channel configuration cache
#[derive(Clone)]
pub struct RedisChannelConfigCache {
    pool: RedisPool,
}

impl RedisChannelConfigCache {
    /// Create a new channel config cache
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for the settings hash
    fn config_key(name: &str) -> String {
        format!("{CHANNEL_PREFIX}{name}:config")
    }

    /// Generate Redis key for the allow-list set
    fn allowlist_key(name: &str) -> String {
        format!("{CHANNEL_PREFIX}{name}:allowlist")
    }

    async fn write(&self, config: &ChannelConfig, ttl: Duration) -> RedisResult<()> {
        let config_key = Self::config_key(&config.name);
        let allowlist_key = Self::allowlist_key(&config.name);
        let ttl = i64::try_from(ttl_seconds(ttl)).unwrap_or(i64::MAX);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .del(&[&config_key, &allowlist_key])
            .ignore()
            .hset_multiple(&config_key, &encode_fields(config))
            .ignore()
            .expire(&config_key, ttl)
            .ignore();

        if !config.allow_list.is_empty() {
            let members: Vec<(usize, &str)> = config
                .allow_list
                .iter()
                .enumerate()
                .map(|(index, entry)| (index, entry.as_str()))
                .collect();
            pipe.zadd_multiple(&allowlist_key, &members)
                .ignore()
                .expire(&allowlist_key, ttl)
                .ignore();
        }

        let mut conn = self.pool.get().await?;
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn read(&self, name: &str) -> RedisResult<Option<ChannelConfig>> {
        let config_key = Self::config_key(name);
        let allowlist_key = Self::allowlist_key(name);

        let mut conn = self.pool.get().await?;
        let (fields, entries): (HashMap<String, String>, Vec<String>) = redis::pipe()
            .hgetall(&config_key)
            .zrange(&allowlist_key, 0, -1)
            .query_async(&mut conn)
            .await?;

        if fields.is_empty() {
            return Ok(None);
        }

        match decode_fields(&fields, entries) {
            Ok(config) => Ok(Some(config)),
            Err(reason) => {
                tracing::warn!(key = %config_key, %reason, "Malformed cache entry, treating as miss");
                Ok(None)
            }
        }
    }
}

/// Flatten the scalar settings into hash fields
fn encode_fields(config: &ChannelConfig) -> Vec<(&'static str, String)> {
    vec![
        (FIELD_NAME, config.name.clone()),
        (FIELD_SLASH, encode_bool(config.require_slash)),
        (FIELD_DOT, encode_bool(config.require_multi_dot)),
        (FIELD_SUBDOMAINS, encode_bool(config.match_subdomains)),
        (FIELD_USERLEVEL, config.minimum_exempt_role.to_string()),
        (FIELD_REPLY, config.reply_template.clone()),
        (FIELD_ALLOW_COUNT, config.allow_list.len().to_string()),
    ]
}

/// Rebuild a config from hash fields and allow-list members.
///
/// Fails if a field is missing or unreadable, or if the allow-list set does
/// not hold as many members as the hash says it should.
fn decode_fields(
    fields: &HashMap<String, String>,
    allow_list: Vec<String>,
) -> Result<ChannelConfig, String> {
    let field = |key: &str| {
        fields
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| format!("missing field {key}"))
    };

    let allow_count: usize = field(FIELD_ALLOW_COUNT)?
        .parse()
        .map_err(|_| "unreadable allow_count".to_string())?;
    if allow_count != allow_list.len() {
        return Err(format!(
            "allow list has {} entries, expected {allow_count}",
            allow_list.len()
        ));
    }

    let minimum_exempt_role: Role = field(FIELD_USERLEVEL)?
        .parse()
        .map_err(|e: linkguard_core::DomainError| e.to_string())?;

    Ok(ChannelConfig {
        name: field(FIELD_NAME)?.to_string(),
        require_slash: decode_bool(field(FIELD_SLASH)?)?,
        require_multi_dot: decode_bool(field(FIELD_DOT)?)?,
        match_subdomains: decode_bool(field(FIELD_SUBDOMAINS)?)?,
        minimum_exempt_role,
        reply_template: field(FIELD_REPLY)?.to_string(),
        allow_list,
    })
}

fn encode_bool(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

fn decode_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(format!("unreadable flag {other}")),
    }
}

#[async_trait]
impl ChannelConfigCache for RedisChannelConfigCache {
    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> RepoResult<Option<ChannelConfig>> {
        Ok(self.read(&normalize_channel_name(name)).await?)
    }

    #[instrument(skip(self, config), fields(channel = %config.name))]
    async fn set(&self, config: &ChannelConfig, ttl: Duration) -> RepoResult<()> {
        self.write(config, ttl).await?;
        tracing::debug!(channel = %config.name, ttl_secs = ttl.as_secs(), "Cached channel config");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, name: &str) -> RepoResult<()> {
        let name = normalize_channel_name(name);
        let config_key = Self::config_key(&name);
        let allowlist_key = Self::allowlist_key(&name);
        self.pool
            .delete_many(&[config_key.as_str(), allowlist_key.as_str()])
            .await?;
        Ok(())
    }
}
