//! Channels the bot is currently in, as reported by the protocol adapter

use std::collections::BTreeSet;

use parking_lot::RwLock;

use linkguard_core::entities::normalize_channel_name;

/// Joined-channel set, updated only from adapter join/part events
#[derive(Debug, Default)]
pub struct JoinedChannels {
    channels: RwLock<BTreeSet<String>>,
}

impl JoinedChannels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, channel: &str) -> bool {
        self.channels.write().insert(normalize_channel_name(channel))
    }

    pub fn remove(&self, channel: &str) -> bool {
        self.channels.write().remove(&normalize_channel_name(channel))
    }

    /// Forget everything (a fresh adapter session starts with no channels)
    pub fn clear(&self) {
        self.channels.write().clear();
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.read().contains(&normalize_channel_name(channel))
    }

    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }

    /// Point-in-time copy for decisions that must not hold the lock
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.channels.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_normalizes() {
        let joined = JoinedChannels::new();
        assert!(joined.insert("#Chan"));
        assert!(!joined.insert("chan"));
        assert!(joined.contains("#CHAN"));
        assert_eq!(joined.len(), 1);

        assert!(joined.remove("#chan"));
        assert!(joined.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let joined = JoinedChannels::new();
        joined.insert("a");
        let snapshot = joined.snapshot();
        joined.insert("b");
        joined.clear();
        assert_eq!(snapshot.into_iter().collect::<Vec<_>>(), vec!["a"]);
        assert!(joined.is_empty());
    }
}
