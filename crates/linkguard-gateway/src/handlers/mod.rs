//! Inbound event processing
//!
//! Events are handled one at a time, start to finish, in arrival order. A
//! failure while handling one event is logged and never stops the loop.

use tokio::sync::mpsc;
use tracing::{debug, info};

use linkguard_core::events::InboundEvent;
use linkguard_service::services::{ModerationService, NoticeService, OutboundService};

use crate::server::GatewayState;

/// Single sequential consumer of adapter events
pub struct EventProcessor {
    state: GatewayState,
}

impl EventProcessor {
    pub fn new(state: GatewayState) -> Self {
        Self { state }
    }

    /// Drain `events` until every sender is gone
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<InboundEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        info!("Event stream closed, processor stopping");
    }

    /// Handle one event
    pub async fn handle(&self, event: InboundEvent) {
        let ctx = self.state.service_context();

        match event {
            InboundEvent::Ready => {
                info!("Adapter ready");
                self.state.joined().clear();

                let outbound = OutboundService::new(ctx);
                let settings = ctx.settings();
                outbound.join(&settings.bot_channel).await;
                for channel in &settings.extra_channels {
                    outbound.join(channel).await;
                }
                self.state.signal_ready();
            }
            InboundEvent::Message(message) => {
                let joined = self.state.joined().snapshot();
                let outcome = ModerationService::new(ctx)
                    .handle_message(&message, &joined)
                    .await;
                debug!(channel = %message.channel, outcome = ?outcome, "Message handled");
            }
            InboundEvent::Notice(notice) => {
                NoticeService::new(ctx).handle_public(&notice).await;
            }
            InboundEvent::PrivateNotice(notice) => {
                NoticeService::new(ctx).handle_private(&notice);
            }
            InboundEvent::Joined { channel } => {
                if ctx.settings().is_bot_channel(&channel) {
                    info!(channel = %channel, "Joined own channel");
                }
                self.state.joined().insert(&channel);
            }
            InboundEvent::Parted { channel } => {
                self.state.joined().remove(&channel);
            }
        }
    }
}
