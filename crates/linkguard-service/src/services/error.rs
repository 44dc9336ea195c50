//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use linkguard_common::AppError;
use linkguard_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or infrastructure failure reported by a port
    Domain(DomainError),

    /// A write that did not reach the authoritative store
    Persistence { channel: String, source: DomainError },

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Persistence { channel, source } => {
                write!(f, "Failed to persist settings for {channel}: {source}")
            }
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) | Self::Persistence { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a persistence error for a channel
    pub fn persistence(channel: impl Into<String>, source: DomainError) -> Self {
        Self::Persistence {
            channel: channel.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether a mutation failed to become durable
    pub fn is_persistence(&self) -> bool {
        match self {
            Self::Persistence { .. } => true,
            Self::Domain(e) => e.is_persistence(),
            _ => false,
        }
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::Persistence { channel, source } => {
                AppError::Database(format!("{channel}: {source}"))
            }
            ServiceError::Validation(msg) | ServiceError::Internal(msg) => {
                AppError::Internal(anyhow::anyhow!(msg))
            }
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error() {
        let err = ServiceError::persistence("chan", DomainError::DatabaseError("down".into()));
        assert!(err.is_persistence());
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
        assert!(err.to_string().contains("chan"));
    }

    #[test]
    fn test_domain_persistence_is_classified() {
        let err = ServiceError::from(DomainError::DatabaseError("down".into()));
        assert!(err.is_persistence());
        assert!(!ServiceError::from(DomainError::CacheError("x".into())).is_persistence());
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError =
            ServiceError::persistence("chan", DomainError::DatabaseError("down".into())).into();
        assert_eq!(app_err.error_code(), "DATABASE_ERROR");
    }
}
