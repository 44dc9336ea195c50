//! Ports implemented by infrastructure crates

mod repositories;

pub use repositories::{
    ChannelConfigCache, ChannelConfigStore, ChatSink, EphemeralStore, RepoResult,
};
