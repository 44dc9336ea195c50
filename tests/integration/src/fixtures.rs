//! Test fixtures and data generators
//!
//! Provides reusable chat events for integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use linkguard_core::events::{ChannelNotice, ChatMessage, InboundEvent};

/// The harness bot's login and own channel
pub const BOT: &str = "guardbot";

/// Counter for unique message ids
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique message id
pub fn unique_id() -> String {
    format!("msg-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// A public message with badges, display name and a fresh id
pub fn chat(channel: &str, sender: &str, badges: &str, text: &str) -> ChatMessage {
    let tags: HashMap<String, String> = [
        ("badges", badges.to_string()),
        ("display-name", sender.to_string()),
        ("id", unique_id()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    ChatMessage {
        channel: format!("#{channel}"),
        sender: sender.to_lowercase(),
        text: text.to_string(),
        tags,
    }
}

pub fn moderator(channel: &str, text: &str) -> ChatMessage {
    chat(channel, "ModUser", "moderator/1", text)
}

pub fn vip(channel: &str, text: &str) -> ChatMessage {
    chat(channel, "VipUser", "vip/1,subscriber/6", text)
}

pub fn viewer(channel: &str, text: &str) -> ChatMessage {
    chat(channel, "Viewer", "", text)
}

/// A message in the bot's own channel
pub fn own_channel(sender: &str, text: &str) -> ChatMessage {
    chat(BOT, sender, "", text)
}

pub fn notice(channel: &str, notice_id: &str) -> InboundEvent {
    InboundEvent::Notice(ChannelNotice {
        channel: format!("#{channel}"),
        notice_id: notice_id.to_string(),
        text: String::new(),
    })
}

/// Message id of a fixture message
pub fn id_of(message: &ChatMessage) -> &str {
    message.message_id().unwrap_or_default()
}
