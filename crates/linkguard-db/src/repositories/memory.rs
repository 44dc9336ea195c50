//! In-process implementation of ChannelConfigStore
//!
//! Used for single-node development and for exercising the repository
//! policies without a database. `set_available(false)` makes every call fail
//! the way an unreachable database would.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use linkguard_core::entities::{normalize_channel_name, ChannelConfig};
use linkguard_core::error::DomainError;
use linkguard_core::traits::{ChannelConfigStore, RepoResult};

/// In-memory authoritative store
#[derive(Debug)]
pub struct MemoryChannelStore {
    channels: RwLock<BTreeMap<String, ChannelConfig>>,
    available: AtomicBool,
    reads: AtomicUsize,
}

impl Default for MemoryChannelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannelStore {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            reads: AtomicUsize::new(0),
        }
    }

    /// Simulate the database going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `find_by_name` calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Direct view of a stored config, bypassing availability
    pub fn snapshot(&self, name: &str) -> Option<ChannelConfig> {
        self.channels.read().get(&normalize_channel_name(name)).cloned()
    }

    fn check(&self) -> RepoResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::DatabaseError(
                "authoritative store unavailable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ChannelConfigStore for MemoryChannelStore {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ChannelConfig>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot(name))
    }

    async fn upsert(&self, config: &ChannelConfig) -> RepoResult<()> {
        self.check()?;
        self.channels
            .write()
            .insert(config.name.clone(), config.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> RepoResult<()> {
        self.check()?;
        self.channels.write().remove(&normalize_channel_name(name));
        Ok(())
    }

    async fn list_names(&self) -> RepoResult<Vec<String>> {
        self.check()?;
        Ok(self.channels.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_whole_document() {
        let store = MemoryChannelStore::new();
        let mut config = ChannelConfig::with_defaults("chan");
        config.allow(["a.com"]);
        store.upsert(&config).await.unwrap();

        let replacement = ChannelConfig::with_defaults("chan");
        store.upsert(&replacement).await.unwrap();

        let found = store.find_by_name("#CHAN").await.unwrap().unwrap();
        assert!(found.allow_list.is_empty());
        assert_eq!(store.list_names().await.unwrap(), vec!["chan"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_loudly() {
        let store = MemoryChannelStore::new();
        store.set_available(false);
        let err = store
            .upsert(&ChannelConfig::with_defaults("chan"))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(store.find_by_name("chan").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = MemoryChannelStore::new();
        store.delete("nobody").await.unwrap();
        assert!(store.list_names().await.unwrap().is_empty());
    }
}
