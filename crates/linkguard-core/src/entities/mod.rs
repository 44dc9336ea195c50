//! Domain entities - core business objects

mod channel_config;
mod ephemeral;
mod role;

pub use channel_config::{
    normalize_channel_name, AllowEntry, ChannelConfig, REPLY_DEFAULT, REPLY_OFF, USER_PLACEHOLDER,
};
pub use ephemeral::{Cooldown, Permit, COOLDOWN_DURATION, PERMIT_DURATION};
pub use role::Role;
