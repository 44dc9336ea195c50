//! Linkguard gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p linkguard-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use anyhow::Context;
use linkguard_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        bot = %config.bot.username,
        address = %config.gateway.address(),
        "Starting linkguard gateway"
    );

    linkguard_gateway::run(config)
        .await
        .context("gateway stopped")?;
    Ok(())
}
