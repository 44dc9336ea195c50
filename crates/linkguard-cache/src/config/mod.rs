//! Channel configuration cache tier.

mod channel_config;

pub use channel_config::RedisChannelConfigCache;
