//! Moderation engine - the per-message decision
//!
//! Every public message ends in exactly one [`ModerationOutcome`]. Nothing is
//! carried between messages except what the stores hold. Replies address the
//! sender by login so the `@` mention reaches them.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};

use linkguard_core::events::ChatMessage;

use super::commands::{Command, CommandService, COMMAND_PREFIX};
use super::context::ServiceContext;
use super::link_check::LinkCheckService;
use super::membership::MembershipService;
use super::outbound::OutboundService;
use super::permit::PermitService;
use super::role::resolve_role;

/// Terminal outcome of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    NoAction,
    CommandExecuted,
    /// The message was deleted (and replied to, unless replies are off)
    Deleted { domains: BTreeSet<String> },
    /// The channel has no configuration; a part was requested
    PartRequested,
}

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Decide and act on one public message.
    ///
    /// `joined` is the protocol side's current channel set, used only by the
    /// own-channel commands.
    #[instrument(skip(self, message, joined), fields(channel = %message.channel, user = %message.sender))]
    pub async fn handle_message(
        &self,
        message: &ChatMessage,
        joined: &BTreeSet<String>,
    ) -> ModerationOutcome {
        let channel = message.channel_name();

        if self.ctx.settings().is_bot_channel(&channel) {
            return match MembershipService::new(self.ctx)
                .handle_own_channel(message, joined)
                .await
            {
                Ok(true) => ModerationOutcome::CommandExecuted,
                Ok(false) => ModerationOutcome::NoAction,
                Err(e) => {
                    warn!(channel = %channel, error = %e, "Own-channel command failed");
                    ModerationOutcome::CommandExecuted
                }
            };
        }

        let config = match self.ctx.repository().get(&channel).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!(channel = %channel, "Message from an unconfigured channel, parting");
                OutboundService::new(self.ctx).part(&channel).await;
                return ModerationOutcome::PartRequested;
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "Config lookup failed, message skipped");
                return ModerationOutcome::NoAction;
            }
        };

        let role = resolve_role(message.badges());

        if role.is_moderator() {
            if !message.text.starts_with(COMMAND_PREFIX) {
                return ModerationOutcome::NoAction;
            }
            return match Command::parse(&message.text) {
                Ok(command) => {
                    if let Err(e) = CommandService::new(self.ctx)
                        .execute(command, &config, &message.sender)
                        .await
                    {
                        warn!(channel = %channel, error = %e, "Command failed");
                    }
                    ModerationOutcome::CommandExecuted
                }
                Err(e) => {
                    debug!(channel = %channel, error = %e, "Ignoring command");
                    ModerationOutcome::NoAction
                }
            };
        }

        if role >= config.minimum_exempt_role {
            return ModerationOutcome::NoAction;
        }

        match PermitService::new(self.ctx)
            .has_permit(&channel, &message.sender)
            .await
        {
            Ok(true) => {
                debug!(channel = %channel, user = %message.sender, "Permit active, link check skipped");
                return ModerationOutcome::NoAction;
            }
            Ok(false) => {}
            Err(e) => warn!(channel = %channel, error = %e, "Permit check failed, treating as none"),
        }

        let domains = LinkCheckService::new(self.ctx)
            .find_disallowed_domains(&message.text, &config)
            .await;
        if domains.is_empty() {
            return ModerationOutcome::NoAction;
        }

        info!(
            channel = %channel,
            user = %message.sender,
            msg_id = message.message_id().unwrap_or_default(),
            domains = ?domains,
            "Disallowed link"
        );

        let outbound = OutboundService::new(self.ctx);
        match message.message_id() {
            Some(id) => {
                outbound.delete_message(&channel, id).await;
            }
            None => warn!(channel = %channel, "Message has no id, cannot delete"),
        }
        if let Some(reply) = config.render_reply(&message.sender) {
            outbound.send_message(&channel, &reply).await;
        }

        ModerationOutcome::Deleted { domains }
    }
}
