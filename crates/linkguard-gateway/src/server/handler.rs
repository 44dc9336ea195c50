//! WebSocket bridge handler
//!
//! One protocol adapter at a time. Inbound `event` frames go to the event
//! processor; queued outbound actions go back as `action` frames.

use std::borrow::Cow;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::protocol::{BridgeMessage, CloseCode, HelloPayload};
use crate::server::GatewayState;

/// WebSocket bridge handler
pub async fn bridge_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded adapter connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Uuid::new_v4().to_string();
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Holding the receiver is what makes this connection the adapter
    let Ok(mut outbound) = state.outbound().try_lock_owned() else {
        tracing::warn!(session_id = %session_id, "Rejecting second adapter connection");
        let _ = ws_sink.send(close_message(CloseCode::AlreadyConnected)).await;
        return;
    };

    state.mark_adapter_seen();
    tracing::info!(session_id = %session_id, "Protocol adapter connected");

    let hello = BridgeMessage::Hello(HelloPayload {
        session_id: session_id.clone(),
        bot_channel: state.service_context().settings().bot_channel.clone(),
    });
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            tracing::warn!(session_id = %session_id, "Failed to send Hello message");
            return;
        }
    }

    let close_code = loop {
        tokio::select! {
            frame = ws_stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Err(code) = handle_text_message(&state, &session_id, &text) {
                        break Some(code);
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(session_id = %session_id, "Binary messages not supported");
                    break Some(CloseCode::DecodeError);
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(session_id = %session_id, "Adapter closed connection");
                    break None;
                }
                Some(Err(e)) => {
                    tracing::warn!(session_id = %session_id, error = %e, "WebSocket error");
                    break None;
                }
            },
            action = outbound.recv() => {
                let Some(action) = action else {
                    break Some(CloseCode::ShuttingDown);
                };
                let Ok(json) = BridgeMessage::Action(action).to_json() else {
                    continue;
                };
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    tracing::warn!(session_id = %session_id, "Failed to send action to adapter");
                    break None;
                }
            }
        }
    };

    if let Some(code) = close_code {
        tracing::debug!(session_id = %session_id, close_code = %code, "Closing bridge");
        let _ = ws_sink.send(close_message(code)).await;
    }
    tracing::info!(session_id = %session_id, "Protocol adapter disconnected");
}

/// Handle a text frame from the adapter
fn handle_text_message(state: &GatewayState, session_id: &str, text: &str) -> Result<(), CloseCode> {
    let message = match BridgeMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "Failed to parse message");
            return Err(CloseCode::DecodeError);
        }
    };

    let BridgeMessage::Event(event) = message else {
        tracing::warn!(session_id = %session_id, "Received gateway-only op from adapter");
        return Err(CloseCode::UnknownOpcode);
    };

    state
        .events()
        .send(event)
        .map_err(|_| CloseCode::ShuttingDown)
}

fn close_message(code: CloseCode) -> Message {
    Message::Close(Some(CloseFrame {
        code: code.as_u16(),
        reason: Cow::Borrowed(code.description()),
    }))
}
