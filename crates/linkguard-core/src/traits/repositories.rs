//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation: an authoritative store, a TTL-bounded cache
//! in front of it, and cache-only ephemeral records.

use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{ChannelConfig, Cooldown, Permit};
use crate::error::DomainError;
use crate::events::OutboundAction;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Authoritative tier
// ============================================================================

/// Durable, always-correct channel configuration storage
#[async_trait]
pub trait ChannelConfigStore: Send + Sync {
    /// Find a channel's configuration by (normalized) name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ChannelConfig>>;

    /// Insert or fully replace a channel's configuration
    async fn upsert(&self, config: &ChannelConfig) -> RepoResult<()>;

    /// Remove a channel. Removing an absent channel is not an error.
    async fn delete(&self, name: &str) -> RepoResult<()>;

    /// Distinct names of all configured channels
    async fn list_names(&self) -> RepoResult<Vec<String>>;
}

// ============================================================================
// Cache tier
// ============================================================================

/// Fast, TTL-bounded mirror of the authoritative store
#[async_trait]
pub trait ChannelConfigCache: Send + Sync {
    /// Cached configuration, `None` on miss or expiry
    async fn get(&self, name: &str) -> RepoResult<Option<ChannelConfig>>;

    /// Store a configuration, (re)starting its TTL
    async fn set(&self, config: &ChannelConfig, ttl: Duration) -> RepoResult<()>;

    /// Drop a cached configuration
    async fn remove(&self, name: &str) -> RepoResult<()>;
}

/// Cache-only records that expire on their own
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    async fn put_permit(&self, permit: &Permit, ttl: Duration) -> RepoResult<()>;

    async fn has_permit(&self, permit: &Permit) -> RepoResult<bool>;

    async fn put_cooldown(&self, cooldown: &Cooldown, ttl: Duration) -> RepoResult<()>;

    async fn has_cooldown(&self, cooldown: &Cooldown) -> RepoResult<bool>;
}

// ============================================================================
// Outbound
// ============================================================================

/// Accepts outbound actions for the protocol adapter.
///
/// Delivery is fire-and-forget; implementations must keep per-channel order.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn dispatch(&self, action: OutboundAction) -> RepoResult<()>;
}
