//! Protocol events - what the chat protocol adapter delivers and accepts
//!
//! The wire protocol itself (connection, auth, framing) lives outside this
//! system. The adapter hands over parsed inbound events and executes
//! outbound actions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::normalize_channel_name;

/// Events delivered by the protocol adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// The adapter is connected and authenticated
    Ready,
    /// A public chat message
    Message(ChatMessage),
    /// A public notice from the platform about a channel
    Notice(ChannelNotice),
    /// A notice addressed to the bot itself
    PrivateNotice(ChannelNotice),
    /// The bot joined a channel
    Joined { channel: String },
    /// The bot left a channel
    Parted { channel: String },
}

/// A public chat message with its metadata tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Target channel (with or without `#`)
    pub channel: String,
    /// Sender login name
    pub sender: String,
    /// Raw message text
    pub text: String,
    /// Metadata tags (`badges`, `id`, ...)
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl ChatMessage {
    /// Channel name, lowercase and without `#`
    pub fn channel_name(&self) -> String {
        normalize_channel_name(&self.channel)
    }

    /// Raw `badges` tag, e.g. `moderator/1,subscriber/12`
    pub fn badges(&self) -> Option<&str> {
        self.tag("badges")
    }

    /// Message id used for deletion
    pub fn message_id(&self) -> Option<&str> {
        self.tag("id").filter(|id| !id.is_empty())
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A platform notice about a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelNotice {
    pub channel: String,
    /// Notice identifier (the `msg-id` tag)
    pub notice_id: String,
    #[serde(default)]
    pub text: String,
}

/// Actions the protocol adapter executes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundAction {
    Join { channel: String },
    Part { channel: String },
    SendMessage { channel: String, text: String },
}

impl OutboundAction {
    pub fn join(channel: &str) -> Self {
        Self::Join {
            channel: normalize_channel_name(channel),
        }
    }

    pub fn part(channel: &str) -> Self {
        Self::Part {
            channel: normalize_channel_name(channel),
        }
    }

    pub fn send(channel: &str, text: impl Into<String>) -> Self {
        Self::SendMessage {
            channel: normalize_channel_name(channel),
            text: text.into(),
        }
    }

    /// Delete a message by id (sent as a chat command)
    pub fn delete(channel: &str, message_id: &str) -> Self {
        Self::send(channel, format!("/delete {message_id}"))
    }

    /// Channel this action targets
    pub fn channel(&self) -> &str {
        match self {
            Self::Join { channel } | Self::Part { channel } | Self::SendMessage { channel, .. } => {
                channel
            }
        }
    }
}
