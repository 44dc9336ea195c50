//! Service context - dependency container for services
//!
//! Holds the configuration repository, the ephemeral store, the outbound
//! sink, the link engine, and the timings every service shares.

use std::sync::Arc;
use std::time::Duration;

use linkguard_common::AppConfig;
use linkguard_core::entities::normalize_channel_name;
use linkguard_core::traits::{ChannelConfigCache, ChannelConfigStore, ChatSink, EphemeralStore};

use crate::links::{LinkEngine, LinkExtractor, RegexPatternMatcher, TldDictionary};

use super::error::{ServiceError, ServiceResult};
use super::repository::ChannelConfigRepository;

/// Identity and timings shared by all services
#[derive(Debug, Clone)]
pub struct ModerationSettings {
    /// The bot's own channel (its login, lowercase)
    pub bot_channel: String,
    /// Channels always joined in addition to the configured ones
    pub extra_channels: Vec<String>,
    pub config_cache_ttl: Duration,
    pub permit_ttl: Duration,
    pub cooldown_ttl: Duration,
    pub pattern_timeout: Duration,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            bot_channel: "linkguard".to_string(),
            extra_channels: Vec::new(),
            config_cache_ttl: Duration::from_secs(1800),
            permit_ttl: linkguard_core::PERMIT_DURATION,
            cooldown_ttl: linkguard_core::COOLDOWN_DURATION,
            pattern_timeout: Duration::from_millis(100),
        }
    }
}

impl ModerationSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bot_channel: normalize_channel_name(&config.bot.username),
            extra_channels: config
                .bot
                .extra_channels
                .iter()
                .map(|c| normalize_channel_name(c))
                .collect(),
            config_cache_ttl: config.moderation.config_cache_ttl(),
            permit_ttl: config.moderation.permit_ttl(),
            cooldown_ttl: config.moderation.cooldown_ttl(),
            pattern_timeout: config.moderation.pattern_timeout(),
        }
    }

    /// Whether `channel` is the bot's own channel
    pub fn is_bot_channel(&self, channel: &str) -> bool {
        normalize_channel_name(channel) == self.bot_channel
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    repository: ChannelConfigRepository,
    ephemeral: Arc<dyn EphemeralStore>,
    sink: Arc<dyn ChatSink>,
    links: LinkEngine,
    settings: Arc<ModerationSettings>,
}

impl ServiceContext {
    pub fn new(
        repository: ChannelConfigRepository,
        ephemeral: Arc<dyn EphemeralStore>,
        sink: Arc<dyn ChatSink>,
        links: LinkEngine,
        settings: ModerationSettings,
    ) -> Self {
        Self {
            repository,
            ephemeral,
            sink,
            links,
            settings: Arc::new(settings),
        }
    }

    /// Get the channel configuration repository
    pub fn repository(&self) -> &ChannelConfigRepository {
        &self.repository
    }

    /// Get the permit/cooldown store
    pub fn ephemeral(&self) -> &dyn EphemeralStore {
        self.ephemeral.as_ref()
    }

    /// Get the raw outbound sink (not cooldown-gated)
    pub fn sink(&self) -> &dyn ChatSink {
        self.sink.as_ref()
    }

    /// Get the link extraction and matching engine
    pub fn links(&self) -> &LinkEngine {
        &self.links
    }

    pub fn settings(&self) -> &ModerationSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repository", &self.repository)
            .field("links", &self.links)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    cache: Option<Arc<dyn ChannelConfigCache>>,
    store: Option<Arc<dyn ChannelConfigStore>>,
    ephemeral: Option<Arc<dyn EphemeralStore>>,
    sink: Option<Arc<dyn ChatSink>>,
    tlds: Option<Arc<TldDictionary>>,
    links: Option<LinkEngine>,
    settings: ModerationSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            cache: None,
            store: None,
            ephemeral: None,
            sink: None,
            tlds: None,
            links: None,
            settings: ModerationSettings::default(),
        }
    }

    pub fn cache(mut self, cache: Arc<dyn ChannelConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(mut self, store: Arc<dyn ChannelConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn ephemeral(mut self, ephemeral: Arc<dyn EphemeralStore>) -> Self {
        self.ephemeral = Some(ephemeral);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ChatSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Share a TLD dictionary (e.g. one refreshed by a background task)
    pub fn tlds(mut self, tlds: Arc<TldDictionary>) -> Self {
        self.tlds = Some(tlds);
        self
    }

    /// Use a fully custom link engine; overrides `tlds`
    pub fn links(mut self, links: LinkEngine) -> Self {
        self.links = Some(links);
        self
    }

    pub fn settings(mut self, settings: ModerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let cache = self
            .cache
            .ok_or_else(|| ServiceError::validation("cache is required"))?;
        let store = self
            .store
            .ok_or_else(|| ServiceError::validation("store is required"))?;
        let ephemeral = self
            .ephemeral
            .ok_or_else(|| ServiceError::validation("ephemeral is required"))?;
        let sink = self
            .sink
            .ok_or_else(|| ServiceError::validation("sink is required"))?;

        let links = self.links.unwrap_or_else(|| {
            LinkEngine::new(
                LinkExtractor::new(self.tlds.unwrap_or_default()),
                Arc::new(RegexPatternMatcher::new()),
                self.settings.pattern_timeout,
            )
        });

        let repository =
            ChannelConfigRepository::new(cache, store, self.settings.config_cache_ttl);

        Ok(ServiceContext::new(
            repository,
            ephemeral,
            sink,
            links,
            self.settings,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
