//! Repository implementations
//!
//! Implementations of the authoritative-tier trait defined in linkguard-core.

mod channel;
mod error;
mod memory;

pub use channel::PgChannelConfigStore;
pub use memory::MemoryChannelStore;
