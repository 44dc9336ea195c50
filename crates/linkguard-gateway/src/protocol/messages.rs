//! Bridge message format
//!
//! Every frame is `{"op": ..., "d": ...}`. The gateway sends `hello` and
//! `action`; the adapter sends `event`.

use serde::{Deserialize, Serialize};

use linkguard_core::events::{InboundEvent, OutboundAction};

/// Sent once, right after the adapter connects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Connection id, for correlating logs
    pub session_id: String,
    /// The bot's own channel
    pub bot_channel: String,
}

/// One bridge frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum BridgeMessage {
    Hello(HelloPayload),
    /// An inbound event from the adapter
    Event(InboundEvent),
    /// An action for the adapter to execute
    Action(OutboundAction),
}

impl BridgeMessage {
    /// Whether the adapter may send this op
    #[must_use]
    pub fn is_adapter_op(&self) -> bool {
        matches!(self, Self::Event(_))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
