//! In-process cache tier.

mod store;

pub use store::MemoryCache;
