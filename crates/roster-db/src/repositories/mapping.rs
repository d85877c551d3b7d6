//! PostgreSQL implementation of MappingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use roster_core::entities::{ExternalResource, Mapping};
use roster_core::traits::{MappingRepository, RepoResult};
use roster_core::value_objects::Snowflake;

use crate::models::MappingModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MappingRepository
///
/// Role mappings and channel mappings live in separate tables.
#[derive(Clone)]
pub struct PgMappingRepository {
    pool: PgPool,
    table: &'static str,
}

impl PgMappingRepository {
    /// Create a repository for one kind of external resource
    pub fn new(pool: PgPool, resource: ExternalResource) -> Self {
        Self {
            pool,
            table: table_name(resource),
        }
    }
}

fn table_name(resource: ExternalResource) -> &'static str {
    match resource {
        ExternalResource::Role => "role_mappings",
        ExternalResource::Channel => "channel_mappings",
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    #[instrument(skip(self), fields(table = self.table))]
    async fn find(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<Option<Mapping>> {
        let result = sqlx::query_as::<_, MappingModel>(&format!(
            r#"
            SELECT id, team_id, internal_id, external_id, created_at, updated_at
            FROM {}
            WHERE team_id = $1 AND internal_id = $2
            "#,
            self.table
        ))
        .bind(team_id)
        .bind(internal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Mapping::from))
    }

    #[instrument(skip(self), fields(table = self.table))]
    async fn upsert(&self, team_id: Uuid, internal_id: Uuid, external_id: Snowflake) -> RepoResult<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (team_id, internal_id, external_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, internal_id)
            DO UPDATE SET external_id = EXCLUDED.external_id, updated_at = NOW()
            "#,
            self.table
        ))
        .bind(team_id)
        .bind(internal_id)
        .bind(external_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(table = self.table))]
    async fn delete(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<()> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE team_id = $1 AND internal_id = $2",
            self.table
        ))
        .bind(team_id)
        .bind(internal_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
