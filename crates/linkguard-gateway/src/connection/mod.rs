//! Adapter-side state the gateway tracks

mod joined;

pub use joined::JoinedChannels;
