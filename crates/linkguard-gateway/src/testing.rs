//! Shared fixtures for gateway unit tests

use std::sync::Arc;

use linkguard_cache::MemoryCache;
use linkguard_core::events::OutboundAction;
use linkguard_db::MemoryChannelStore;
use linkguard_service::{ModerationSettings, QueueSink, ServiceContextBuilder};

use crate::server::GatewayState;

/// State over in-memory tiers with bot channel `guardbot`
pub fn state(extra_channels: &[&str]) -> GatewayState {
    let cache = Arc::new(MemoryCache::new());
    let (sink, outbound) = QueueSink::channel();
    let ctx = ServiceContextBuilder::new()
        .cache(cache.clone())
        .store(Arc::new(MemoryChannelStore::new()))
        .ephemeral(cache)
        .sink(Arc::new(sink))
        .settings(ModerationSettings {
            bot_channel: "guardbot".to_string(),
            extra_channels: extra_channels.iter().map(|c| (*c).to_string()).collect(),
            ..Default::default()
        })
        .build()
        .unwrap();
    GatewayState::new(ctx, outbound).0
}

/// Next queued outbound action, if one is already waiting
pub async fn next_action(state: &GatewayState) -> Option<OutboundAction> {
    state.outbound().lock().await.try_recv().ok()
}
