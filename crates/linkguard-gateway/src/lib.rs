//! # linkguard-gateway
//!
//! Bridge between the chat protocol adapter and the moderation services.
//!
//! The adapter connects over WebSocket to `/bridge`, sends inbound events,
//! and executes the outbound actions it receives.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod scheduler;
pub mod server;

#[cfg(test)]
mod testing;

pub use handlers::EventProcessor;
pub use server::{create_app, run, serve, GatewayState};
