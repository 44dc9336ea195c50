//! Permit and cooldown issuance

use tracing::{info, instrument};

use linkguard_core::entities::{Cooldown, Permit};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Permit & cooldown service
pub struct PermitService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermitService<'a> {
    /// Create a new PermitService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Let `user` post any link in `channel` for the permit duration
    #[instrument(skip(self))]
    pub async fn issue_permit(&self, channel: &str, user: &str) -> ServiceResult<Permit> {
        let permit = Permit::new(channel, user);
        self.ctx
            .ephemeral()
            .put_permit(&permit, self.ctx.settings().permit_ttl)
            .await?;
        info!(channel = %permit.channel, user = %permit.user, "Permit issued");
        Ok(permit)
    }

    /// Whether `user` currently holds a permit in `channel`
    #[instrument(skip(self))]
    pub async fn has_permit(&self, channel: &str, user: &str) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .ephemeral()
            .has_permit(&Permit::new(channel, user))
            .await?)
    }

    /// Suppress outbound sends to `channel` for the cooldown duration
    #[instrument(skip(self))]
    pub async fn set_cooldown(&self, channel: &str) -> ServiceResult<()> {
        let cooldown = Cooldown::new(channel);
        self.ctx
            .ephemeral()
            .put_cooldown(&cooldown, self.ctx.settings().cooldown_ttl)
            .await?;
        info!(channel = %cooldown.channel, "Channel cooldown set");
        Ok(())
    }

    /// Whether sends to `channel` are currently suppressed
    #[instrument(skip(self))]
    pub async fn check_cooldown(&self, channel: &str) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .ephemeral()
            .has_cooldown(&Cooldown::new(channel))
            .await?)
    }
}
