//! Application error types
//!
//! Process-level errors raised while wiring up and running the bot.

use linkguard_core::DomainError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Redis errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Protocol bridge errors
    #[error("Bridge error: {0}")]
    Bridge(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Get a stable error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Bridge(_) => "BRIDGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
