//! Platform notice handling
//!
//! Public notices are classified by their notice id. Rate-limit style notices
//! put the channel on cooldown, removal style notices make the bot leave.

use tracing::{info, instrument, warn};

use linkguard_core::entities::normalize_channel_name;
use linkguard_core::events::ChannelNotice;

use super::context::ServiceContext;
use super::outbound::OutboundService;
use super::permit::PermitService;

/// Notices that say nothing about the bot's ability to moderate
const IGNORE_NOTICES: &[&str] = &[
    "host_on",
    "host_off",
    "host_target_went_offline",
    "emote_only_on",
    "emote_only_off",
    "subs_on",
    "subs_off",
    "slow_on",
    "slow_off",
    "followers_on",
    "followers_on_zero",
    "followers_off",
    "r9k_on",
    "r9k_off",
    "already_emote_only_on",
    "already_emote_only_off",
    "already_subs_on",
    "already_subs_off",
    "already_r9k_on",
    "already_r9k_off",
    "msg_requires_verified_phone_number",
];

/// Notices meaning our sends are being dropped for now
const COOLDOWN_NOTICES: &[&str] = &[
    "msg_ratelimit",
    "msg_duplicate",
    "msg_slowmode",
    "msg_timedout",
    "msg_followersonly",
    "msg_followersonly_followed",
    "msg_followersonly_zero",
    "msg_subsonly",
    "msg_emoteonly",
    "msg_r9k",
    "msg_verified_email",
];

/// Notices meaning the bot is not wanted in the channel
const LEAVE_NOTICES: &[&str] = &[
    "msg_banned",
    "msg_channel_suspended",
    "msg_channel_blocked",
    "tos_ban",
];

/// How a notice id is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Ignore,
    Cooldown,
    Leave,
    Unknown,
}

impl NoticeKind {
    pub fn classify(notice_id: &str) -> Self {
        if IGNORE_NOTICES.contains(&notice_id) {
            Self::Ignore
        } else if COOLDOWN_NOTICES.contains(&notice_id) {
            Self::Cooldown
        } else if LEAVE_NOTICES.contains(&notice_id) {
            Self::Leave
        } else {
            Self::Unknown
        }
    }
}

/// Notice service
pub struct NoticeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NoticeService<'a> {
    /// Create a new NoticeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Act on a public notice about a channel
    #[instrument(skip(self, notice), fields(channel = %notice.channel, notice_id = %notice.notice_id))]
    pub async fn handle_public(&self, notice: &ChannelNotice) -> NoticeKind {
        let channel = normalize_channel_name(&notice.channel);
        let kind = NoticeKind::classify(&notice.notice_id);

        match kind {
            NoticeKind::Ignore => {
                info!(channel = %channel, notice_id = %notice.notice_id, "Ignored notice");
            }
            NoticeKind::Cooldown => {
                info!(channel = %channel, notice_id = %notice.notice_id, "Notice received; adding to cooldown");
                if let Err(e) = PermitService::new(self.ctx).set_cooldown(&channel).await {
                    warn!(channel = %channel, error = %e, "Failed to set cooldown");
                }
            }
            NoticeKind::Leave => {
                info!(channel = %channel, notice_id = %notice.notice_id, "Notice received; leaving");
                self.leave(&channel).await;
            }
            NoticeKind::Unknown => {
                info!(channel = %channel, notice_id = %notice.notice_id, "Unknown notice");
            }
        }
        kind
    }

    /// Private notices carry nothing actionable; they are only recorded
    pub fn handle_private(&self, notice: &ChannelNotice) {
        info!(
            channel = %notice.channel,
            notice_id = %notice.notice_id,
            text = %notice.text,
            "Unknown private notice"
        );
    }

    async fn leave(&self, channel: &str) {
        match self.ctx.repository().get(channel).await {
            Ok(Some(_)) => {}
            Ok(None) => return,
            Err(e) => {
                warn!(channel = %channel, error = %e, "Config lookup failed, not leaving");
                return;
            }
        }

        if let Err(e) = self.ctx.repository().delete(channel).await {
            warn!(channel = %channel, error = %e, "Failed to delete config, not leaving");
            return;
        }
        OutboundService::new(self.ctx).part(channel).await;
    }
}
