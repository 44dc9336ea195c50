//! Cache-only permits and cooldowns.

mod store;

pub use store::RedisEphemeralStore;
