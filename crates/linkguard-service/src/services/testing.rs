//! Shared fixtures for service unit tests

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use linkguard_cache::MemoryCache;
use linkguard_core::events::OutboundAction;
use linkguard_db::MemoryChannelStore;

use linkguard_core::error::DomainError;

use crate::links::{LinkEngine, LinkExtractor, PatternMatcher, TldDictionary};

use super::context::{ModerationSettings, ServiceContext, ServiceContextBuilder};
use super::outbound::QueueSink;

pub const BOT: &str = "guardbot";

type Fixture = (
    ServiceContext,
    UnboundedReceiver<OutboundAction>,
    Arc<MemoryCache>,
    Arc<MemoryChannelStore>,
);

/// Context over in-memory tiers, with the outbound queue receiver
pub fn context() -> Fixture {
    build(None)
}

/// Same as [`context`] with a custom pattern matcher
pub fn context_with_matcher(matcher: Arc<dyn PatternMatcher>) -> Fixture {
    build(Some(LinkEngine::new(
        LinkExtractor::new(Arc::new(TldDictionary::builtin())),
        matcher,
        Duration::from_millis(100),
    )))
}

fn build(links: Option<LinkEngine>) -> Fixture {
    let cache = Arc::new(MemoryCache::new());
    let store = Arc::new(MemoryChannelStore::new());
    let (sink, rx) = QueueSink::channel();

    let mut builder = ServiceContextBuilder::new();
    if let Some(links) = links {
        builder = builder.links(links);
    }
    let ctx = builder
        .cache(cache.clone())
        .store(store.clone())
        .ephemeral(cache.clone())
        .sink(Arc::new(sink))
        .settings(ModerationSettings {
            bot_channel: BOT.to_string(),
            ..Default::default()
        })
        .build()
        .unwrap();

    (ctx, rx, cache, store)
}

/// Everything queued so far
pub fn drain(rx: &mut UnboundedReceiver<OutboundAction>) -> Vec<OutboundAction> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

/// Never matches; remembers which patterns were forgotten
#[derive(Default)]
pub struct RecordingMatcher {
    pub forgotten: Mutex<Vec<String>>,
}

impl PatternMatcher for RecordingMatcher {
    fn is_match(&self, _pattern: &str, _candidate: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    fn forget(&self, pattern: &str) {
        self.forgotten.lock().push(pattern.to_string());
    }
}
