//! Error handling utilities for repositories

use linkguard_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    tracing::error!(error = %e, "Authoritative store query failed");
    DomainError::DatabaseError(e.to_string())
}
