//! Test helpers for integration tests
//!
//! [`TestBot`] drives the event processor directly over in-memory tiers.
//! [`TestServer`] serves the real WebSocket bridge on a loopback port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use linkguard_cache::MemoryCache;
use linkguard_core::events::{ChatMessage, InboundEvent, OutboundAction};
use linkguard_db::MemoryChannelStore;
use linkguard_gateway::protocol::BridgeMessage;
use linkguard_gateway::{serve, EventProcessor, GatewayState};
use linkguard_service::{ModerationSettings, QueueSink, ServiceContext, ServiceContextBuilder};

use crate::fixtures::BOT;

/// Bridge client stream
pub type BridgeClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// In-memory tiers plus the context built over them
pub fn memory_context() -> (
    ServiceContext,
    UnboundedReceiver<OutboundAction>,
    Arc<MemoryCache>,
    Arc<MemoryChannelStore>,
) {
    let cache = Arc::new(MemoryCache::new());
    let store = Arc::new(MemoryChannelStore::new());
    let (sink, outbound) = QueueSink::channel();

    let ctx = ServiceContextBuilder::new()
        .cache(cache.clone())
        .store(store.clone())
        .ephemeral(cache.clone())
        .sink(Arc::new(sink))
        .settings(ModerationSettings {
            bot_channel: BOT.to_string(),
            ..Default::default()
        })
        .build()
        .expect("memory context builds");

    (ctx, outbound, cache, store)
}

/// Bot harness that feeds events straight to the processor
pub struct TestBot {
    pub state: GatewayState,
    pub cache: Arc<MemoryCache>,
    pub store: Arc<MemoryChannelStore>,
    processor: EventProcessor,
    actions: UnboundedReceiver<OutboundAction>,
}

impl TestBot {
    pub fn new() -> Self {
        let (ctx, actions, cache, store) = memory_context();
        // The bridge side is unused here; actions are read from `actions`
        let (state, _events) = GatewayState::new(ctx, tokio::sync::mpsc::unbounded_channel().1);
        Self {
            processor: EventProcessor::new(state.clone()),
            state,
            cache,
            store,
            actions,
        }
    }

    /// Handle one event to completion
    pub async fn deliver(&self, event: InboundEvent) {
        self.processor.handle(event).await;
    }

    pub async fn say(&self, message: ChatMessage) {
        self.deliver(InboundEvent::Message(message)).await;
    }

    /// Report the bot as joined to `channel`
    pub async fn joined(&self, channel: &str) {
        self.deliver(InboundEvent::Joined {
            channel: format!("#{channel}"),
        })
        .await;
    }

    /// Every action issued since the last drain
    pub fn drain(&mut self) -> Vec<OutboundAction> {
        let mut actions = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            actions.push(action);
        }
        actions
    }
}

impl Default for TestBot {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridge server on a loopback port with its processor running
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryChannelStore>,
    _server: JoinHandle<()>,
    _processor: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let (ctx, outbound, _cache, store) = memory_context();
        let (state, events) = GatewayState::new(ctx, outbound);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let processor = tokio::spawn(EventProcessor::new(state.clone()).run(events));
        let server = tokio::spawn(async move {
            serve(listener, state).await.ok();
        });

        Ok(Self {
            addr,
            store,
            _server: server,
            _processor: processor,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Connect a bridge client
    pub async fn connect(&self) -> Result<BridgeClient> {
        let (client, _) = connect_async(format!("ws://{}/bridge", self.addr)).await?;
        Ok(client)
    }
}

/// Next non-control frame, failing after five seconds
pub async fn next_message(client: &mut BridgeClient) -> Result<Message> {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .context("timed out waiting for a frame")?
            .context("bridge closed")??;
        if !matches!(frame, Message::Ping(_) | Message::Pong(_)) {
            return Ok(frame);
        }
    }
}

/// Next frame, decoded as a bridge message
pub async fn next_bridge_message(client: &mut BridgeClient) -> Result<BridgeMessage> {
    match next_message(client).await? {
        Message::Text(text) => Ok(BridgeMessage::from_json(&text)?),
        other => anyhow::bail!("expected a text frame, got {other:?}"),
    }
}

/// Next frame, which must be an outbound action
pub async fn next_action(client: &mut BridgeClient) -> Result<OutboundAction> {
    match next_bridge_message(client).await? {
        BridgeMessage::Action(action) => Ok(action),
        other => anyhow::bail!("expected an action, got {other:?}"),
    }
}

/// Send an inbound event to the gateway
pub async fn send_event(client: &mut BridgeClient, event: InboundEvent) -> Result<()> {
    let json = BridgeMessage::Event(event).to_json()?;
    client.send(Message::Text(json)).await?;
    Ok(())
}
