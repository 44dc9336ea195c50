//! Outbound actions with the channel cooldown gate
//!
//! Every chat send goes through [`OutboundService::send_message`], which drops
//! the send while the channel is cooling down. Joins and parts are not gated.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

use linkguard_core::error::DomainError;
use linkguard_core::events::OutboundAction;
use linkguard_core::traits::{ChatSink, RepoResult};

use super::context::ServiceContext;
use super::permit::PermitService;

/// Cooldown-gated sender
pub struct OutboundService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OutboundService<'a> {
    /// Create a new OutboundService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a chat message unless the channel is cooling down.
    ///
    /// Returns whether the message was handed to the sink.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, channel: &str, text: &str) -> bool {
        match PermitService::new(self.ctx).check_cooldown(channel).await {
            Ok(true) => {
                debug!(channel = %channel, "Send suppressed by cooldown");
                return false;
            }
            Ok(false) => {}
            Err(e) => warn!(channel = %channel, error = %e, "Cooldown check failed, sending anyway"),
        }
        self.dispatch(OutboundAction::send(channel, text)).await
    }

    /// Delete a message by id (a gated send)
    pub async fn delete_message(&self, channel: &str, message_id: &str) -> bool {
        self.send_message(channel, &format!("/delete {message_id}"))
            .await
    }

    #[instrument(skip(self))]
    pub async fn join(&self, channel: &str) -> bool {
        self.dispatch(OutboundAction::join(channel)).await
    }

    #[instrument(skip(self))]
    pub async fn part(&self, channel: &str) -> bool {
        self.dispatch(OutboundAction::part(channel)).await
    }

    async fn dispatch(&self, action: OutboundAction) -> bool {
        match self.ctx.sink().dispatch(action).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Outbound action dropped");
                false
            }
        }
    }
}

/// Sink that queues actions for whoever drains the receiver.
///
/// Dispatch never waits; actions come out in the order they were issued.
#[derive(Debug, Clone)]
pub struct QueueSink {
    tx: mpsc::UnboundedSender<OutboundAction>,
}

impl QueueSink {
    pub fn new(tx: mpsc::UnboundedSender<OutboundAction>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver that drains it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl ChatSink for QueueSink {
    async fn dispatch(&self, action: OutboundAction) -> RepoResult<()> {
        self.tx
            .send(action)
            .map_err(|e| DomainError::OutboundError(format!("outbound queue closed: {e}")))
    }
}
