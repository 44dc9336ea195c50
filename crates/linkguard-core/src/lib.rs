//! # linkguard-core
//!
//! Domain layer containing the channel configuration model, roles, ephemeral
//! records, protocol events, and the repository traits (ports).
//! This crate has zero dependencies on infrastructure (database, cache, network).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    normalize_channel_name, AllowEntry, ChannelConfig, Cooldown, Permit, Role, COOLDOWN_DURATION,
    PERMIT_DURATION, REPLY_DEFAULT, REPLY_OFF, USER_PLACEHOLDER,
};
pub use error::DomainError;
pub use events::{ChannelNotice, ChatMessage, InboundEvent, OutboundAction};
pub use traits::{
    ChannelConfigCache, ChannelConfigStore, ChatSink, EphemeralStore, RepoResult,
};
