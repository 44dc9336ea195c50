//! Gateway server setup
//!
//! Builds the service context over PostgreSQL and Redis, wires the bridge
//! route, and runs the event processor and background tasks.

mod handler;
mod state;

pub use handler::bridge_handler;
pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use linkguard_cache::{RedisChannelConfigCache, RedisEphemeralStore, RedisPool, RedisPoolConfig};
use linkguard_common::{AppConfig, AppError};
use linkguard_db::{PgChannelConfigStore, PgPool};
use linkguard_service::{ModerationSettings, QueueSink, ServiceContext, ServiceContextBuilder, TldDictionary};

use crate::handlers::EventProcessor;
use crate::scheduler;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/bridge", get(bridge_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect both tiers and build the service context
pub async fn create_service_context(
    config: &AppConfig,
    tlds: Arc<TldDictionary>,
    sink: QueueSink,
) -> Result<ServiceContext, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let pool: PgPool = linkguard_db::create_pool(&linkguard_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    linkguard_db::ensure_schema(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    tracing::info!("Connecting to Redis...");
    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        // Cache failures degrade to PostgreSQL
        tracing::warn!(error = %e, "Redis not reachable yet, continuing");
    } else {
        tracing::info!("Redis connection established");
    }

    ServiceContextBuilder::new()
        .cache(Arc::new(RedisChannelConfigCache::new(redis_pool.clone())))
        .store(Arc::new(PgChannelConfigStore::new(pool)))
        .ephemeral(Arc::new(RedisEphemeralStore::new(redis_pool)))
        .sink(Arc::new(sink))
        .tlds(tlds)
        .settings(ModerationSettings::from_config(config))
        .build()
        .map_err(AppError::from)
}

/// Serve the bridge on `listener` until the server stops
pub async fn serve(listener: TcpListener, state: GatewayState) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Bridge(e.to_string()))?;
    tracing::info!("Bridge listening on ws://{}/bridge", addr);

    axum::serve(listener, create_app(state))
        .await
        .map_err(|e| AppError::Bridge(format!("Server error: {e}")))
}

/// Run the complete gateway with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Bridge(format!("Invalid listen address: {e}")))?;

    let tlds = Arc::new(TldDictionary::builtin());
    let (sink, outbound) = QueueSink::channel();
    let ctx = create_service_context(&config, tlds.clone(), sink).await?;
    let (state, events) = GatewayState::new(ctx, outbound);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Bridge(format!("Failed to bind to {addr}: {e}")))?;

    tokio::spawn(EventProcessor::new(state.clone()).run(events));

    let schedule = &config.schedule;
    scheduler::spawn_tld_refresh(
        tlds,
        reqwest::Client::new(),
        schedule.tld_source_url.clone(),
        Duration::from_secs(schedule.tld_refresh_secs),
    );
    scheduler::spawn_reconciliation(
        state.clone(),
        Duration::from_secs(schedule.reconcile_initial_delay_secs),
        Duration::from_secs(schedule.reconcile_interval_secs),
    );

    let watchdog = async {
        scheduler::wait_for_adapter(
            state.subscribe_adapter_seen(),
            Duration::from_secs(schedule.connect_timeout_secs),
        )
        .await?;
        std::future::pending::<Result<(), AppError>>().await
    };

    tokio::select! {
        result = serve(listener, state.clone()) => result,
        result = watchdog => result,
    }
}
