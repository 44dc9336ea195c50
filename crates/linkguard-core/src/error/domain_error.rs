//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Invalid allow-list pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // =========================================================================
    // Containment
    // =========================================================================
    #[error("Pattern {pattern} exceeded its {budget_ms}ms budget")]
    PatternTimeout { pattern: String, budget_ms: u64 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Outbound error: {0}")]
    OutboundError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and bridge frames
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::MalformedCommand(_) => "MALFORMED_COMMAND",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::PatternTimeout { .. } => "PATTERN_TIMEOUT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::OutboundError(_) => "OUTBOUND_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_))
    }

    /// Cache tier trouble: callers degrade to the authoritative tier
    pub fn is_transient_cache(&self) -> bool {
        matches!(self, Self::CacheError(_))
    }

    /// A write that did not reach the authoritative tier
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRole(_) | Self::MalformedCommand(_) | Self::InvalidPattern { .. }
        )
    }
}
