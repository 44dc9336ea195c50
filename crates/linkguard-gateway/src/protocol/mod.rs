//! Bridge protocol between the gateway and the chat protocol adapter

mod close_codes;
mod messages;

pub use close_codes::CloseCode;
pub use messages::{BridgeMessage, HelloPayload};
