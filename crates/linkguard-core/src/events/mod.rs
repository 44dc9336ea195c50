//! Protocol events exchanged with the chat protocol adapter

mod protocol;

pub use protocol::{ChannelNotice, ChatMessage, InboundEvent, OutboundAction};
