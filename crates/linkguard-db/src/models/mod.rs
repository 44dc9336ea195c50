//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;

pub use channel::{ChannelDocument, ChannelRow};
