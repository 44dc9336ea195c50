//! # linkguard-db
//!
//! Authoritative tier implementing `ChannelConfigStore` with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! Each channel is stored as one JSONB document keyed by its name. This crate handles:
//!
//! - Connection pool management and schema bootstrap
//! - The stored document model and its entity mapper
//! - `PgChannelConfigStore`, plus `MemoryChannelStore` for running without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use linkguard_db::{create_pool, ensure_schema, DatabaseConfig, PgChannelConfigStore};
//! use linkguard_core::traits::ChannelConfigStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     ensure_schema(&pool).await?;
//!     let store = PgChannelConfigStore::new(pool);
//!     let names = store.list_names().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ensure_schema, DatabaseConfig, PgPool};
pub use repositories::{MemoryChannelStore, PgChannelConfigStore};
