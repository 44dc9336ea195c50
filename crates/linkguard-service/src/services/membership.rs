//! Channel membership: own-channel `!join`/`!leave` and reconciliation
//!
//! The joined set belongs to the protocol side. This module only reads a
//! snapshot of it and emits join/part intents.

use std::collections::BTreeSet;

use tracing::{info, instrument, warn};

use linkguard_core::entities::{normalize_channel_name, ChannelConfig};
use linkguard_core::events::ChatMessage;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::outbound::OutboundService;

/// Joins and parts that bring the joined set to the desired set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub join: Vec<String>,
    pub part: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.join.is_empty() && self.part.is_empty()
    }
}

/// Pure diff between where the bot should be and where it is
pub fn plan_reconciliation(desired: &BTreeSet<String>, joined: &BTreeSet<String>) -> ReconcilePlan {
    ReconcilePlan {
        join: desired.difference(joined).cloned().collect(),
        part: joined.difference(desired).cloned().collect(),
    }
}

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle a message in the bot's own channel.
    ///
    /// Returns true when the message was `!join` or `!leave`.
    #[instrument(skip(self, message, joined), fields(user = %message.sender))]
    pub async fn handle_own_channel(
        &self,
        message: &ChatMessage,
        joined: &BTreeSet<String>,
    ) -> ServiceResult<bool> {
        let owner = normalize_channel_name(&message.sender);
        match message.text.trim().to_lowercase().as_str() {
            "!join" => self.join(&owner, joined).await.map(|()| true),
            "!leave" => self.leave(&owner, joined).await.map(|()| true),
            _ => Ok(false),
        }
    }

    async fn join(&self, owner: &str, joined: &BTreeSet<String>) -> ServiceResult<()> {
        let outbound = OutboundService::new(self.ctx);

        if self.ctx.repository().get(owner).await?.is_none() {
            let config = ChannelConfig::with_defaults(owner);
            self.ctx.repository().put(&config).await?;
            info!(channel = %owner, "Channel created with default settings");
            outbound.join(owner).await;
            outbound
                .send_message(
                    &self.ctx.settings().bot_channel,
                    &format!("Joined #{owner} with default settings."),
                )
                .await;
        } else if !joined.contains(owner) {
            outbound.join(owner).await;
        }
        Ok(())
    }

    async fn leave(&self, owner: &str, joined: &BTreeSet<String>) -> ServiceResult<()> {
        let outbound = OutboundService::new(self.ctx);

        if self.ctx.repository().get(owner).await?.is_some() {
            self.ctx.repository().delete(owner).await?;
            info!(channel = %owner, "Channel removed by its owner");
            outbound.part(owner).await;
        } else if joined.contains(owner) {
            outbound.part(owner).await;
        }
        Ok(())
    }

    /// Where the bot should be: configured channels, its own, and the extras
    pub async fn desired_channels(&self) -> ServiceResult<BTreeSet<String>> {
        let settings = self.ctx.settings();
        let mut desired: BTreeSet<String> = self
            .ctx
            .repository()
            .list_all()
            .await?
            .into_iter()
            .collect();
        desired.insert(settings.bot_channel.clone());
        desired.extend(settings.extra_channels.iter().cloned());
        Ok(desired)
    }

    /// Join missing channels and part stale ones.
    ///
    /// If the configured channels cannot be listed the run is skipped.
    #[instrument(skip(self, joined), fields(joined = joined.len()))]
    pub async fn reconcile(&self, joined: &BTreeSet<String>) -> ReconcilePlan {
        let desired = match self.desired_channels().await {
            Ok(desired) => desired,
            Err(e) => {
                warn!(error = %e, "Channel listing failed, skipping reconciliation");
                return ReconcilePlan::default();
            }
        };

        let plan = plan_reconciliation(&desired, joined);
        let outbound = OutboundService::new(self.ctx);
        for channel in &plan.join {
            outbound.join(channel).await;
        }
        for channel in &plan.part {
            outbound.part(channel).await;
        }

        if !plan.is_empty() {
            info!(joins = plan.join.len(), parts = plan.part.len(), "Membership reconciled");
        }
        plan
    }
}
