//! PostgreSQL implementation of ChannelConfigStore

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use linkguard_core::entities::{normalize_channel_name, ChannelConfig};
use linkguard_core::traits::{ChannelConfigStore, RepoResult};

use crate::models::{ChannelDocument, ChannelRow};

use super::error::map_db_error;

/// PostgreSQL implementation of ChannelConfigStore
#[derive(Clone)]
pub struct PgChannelConfigStore {
    pool: PgPool,
}

impl PgChannelConfigStore {
    /// Create a new PgChannelConfigStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelConfigStore for PgChannelConfigStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ChannelConfig>> {
        let result = sqlx::query_as::<_, ChannelRow>(
            r"
            SELECT name, document, updated_at
            FROM channels
            WHERE name = $1
            ",
        )
        .bind(normalize_channel_name(name))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|row| ChannelConfig::from(row.document.0)))
    }

    #[instrument(skip(self, config), fields(channel = %config.name))]
    async fn upsert(&self, config: &ChannelConfig) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channels (name, document, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO UPDATE
            SET document = EXCLUDED.document, updated_at = NOW()
            ",
        )
        .bind(&config.name)
        .bind(Json(ChannelDocument::from(config)))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM channels
            WHERE name = $1
            ",
        )
        .bind(normalize_channel_name(name))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_names(&self) -> RepoResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT name
            FROM channels
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(names)
    }
}
