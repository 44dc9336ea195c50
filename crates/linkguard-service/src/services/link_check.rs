//! Link check service - disallowed domains plus pattern eviction

use std::collections::BTreeSet;

use tracing::{error, info, instrument};

use linkguard_core::entities::ChannelConfig;

use crate::links::LinkVerdict;

use super::context::ServiceContext;
use super::outbound::OutboundService;

/// Link check service
pub struct LinkCheckService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkCheckService<'a> {
    /// Create a new LinkCheckService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Hosts in `message` that no allow rule in `config` covers.
    ///
    /// Pattern entries that run out of time are removed from the channel's
    /// allow list and the channel is told about it.
    #[instrument(skip(self, message, config), fields(channel = %config.name))]
    pub async fn find_disallowed_domains(
        &self,
        message: &str,
        config: &ChannelConfig,
    ) -> BTreeSet<String> {
        let verdict = self.ctx.links().evaluate(message, config).await;
        if !verdict.expired_patterns.is_empty() {
            self.evict_patterns(config, &verdict.expired_patterns).await;
        }
        verdict.disallowed
    }

    /// Evaluate without evicting anything (for `!links test`)
    pub async fn dry_run(&self, message: &str, config: &ChannelConfig) -> LinkVerdict {
        self.ctx.links().evaluate(message, config).await
    }

    async fn evict_patterns(&self, config: &ChannelConfig, expired: &[String]) {
        let mut updated = config.clone();
        if !updated.deny(expired.iter().map(String::as_str)) {
            return;
        }

        if let Err(e) = self.ctx.repository().put(&updated).await {
            error!(channel = %config.name, error = %e, "Failed to evict slow allow-list pattern");
            return;
        }
        self.ctx
            .links()
            .forget_patterns(expired.iter().map(String::as_str));

        let outbound = OutboundService::new(self.ctx);
        for entry in expired {
            info!(channel = %config.name, entry = %entry, "Evicted slow allow-list pattern");
            outbound
                .send_message(
                    &config.name,
                    &format!(
                        "Removed {entry} from the allow list in {} because it took too long to evaluate.",
                        config.name
                    ),
                )
                .await;
        }
    }
}
