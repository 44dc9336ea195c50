//! Gateway state
//!
//! Application state shared by the bridge handler, the event processor, and
//! the background tasks.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};

use linkguard_core::events::{InboundEvent, OutboundAction};
use linkguard_service::ServiceContext;

use crate::connection::JoinedChannels;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with the repository, stores, and link engine
    service_context: Arc<ServiceContext>,
    /// Channels the adapter reports the bot is in
    joined: Arc<JoinedChannels>,
    /// Inbound events, drained by the single event processor
    events: mpsc::UnboundedSender<InboundEvent>,
    /// Outbound actions; whoever holds the lock is the connected adapter
    outbound: Arc<Mutex<mpsc::UnboundedReceiver<OutboundAction>>>,
    /// Bumped on every adapter `ready`
    ready: Arc<watch::Sender<u64>>,
    /// Set once any adapter has connected
    adapter_seen: Arc<watch::Sender<bool>>,
}

impl GatewayState {
    /// Create the state and the receiver the event processor drains
    pub fn new(
        service_context: ServiceContext,
        outbound: mpsc::UnboundedReceiver<OutboundAction>,
    ) -> (Self, mpsc::UnboundedReceiver<InboundEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = Self {
            service_context: Arc::new(service_context),
            joined: Arc::new(JoinedChannels::new()),
            events: events_tx,
            outbound: Arc::new(Mutex::new(outbound)),
            ready: Arc::new(watch::Sender::new(0)),
            adapter_seen: Arc::new(watch::Sender::new(false)),
        };
        (state, events_rx)
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn joined(&self) -> &JoinedChannels {
        &self.joined
    }

    pub fn events(&self) -> &mpsc::UnboundedSender<InboundEvent> {
        &self.events
    }

    pub(crate) fn outbound(&self) -> Arc<Mutex<mpsc::UnboundedReceiver<OutboundAction>>> {
        Arc::clone(&self.outbound)
    }

    /// Record an adapter `ready`
    pub fn signal_ready(&self) {
        self.ready.send_modify(|generation| *generation += 1);
    }

    /// Watch adapter `ready` signals
    pub fn subscribe_ready(&self) -> watch::Receiver<u64> {
        self.ready.subscribe()
    }

    pub fn mark_adapter_seen(&self) {
        self.adapter_seen.send_replace(true);
    }

    pub fn subscribe_adapter_seen(&self) -> watch::Receiver<bool> {
        self.adapter_seen.subscribe()
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("service_context", &self.service_context)
            .field("joined", &self.joined.len())
            .finish()
    }
}
