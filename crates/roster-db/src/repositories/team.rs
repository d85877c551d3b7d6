//! PostgreSQL implementation of TeamRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use roster_core::traits::{RepoResult, TeamRepository};
use roster_core::value_objects::Snowflake;

use super::error::{map_db_error, team_not_found};

/// PostgreSQL implementation of TeamRepository
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    /// Create a new PgTeamRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    #[instrument(skip(self))]
    async fn find_external_guild(&self, team_id: Uuid) -> RepoResult<Option<Snowflake>> {
        let guild = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT discord_guild_id FROM teams WHERE id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| team_not_found(team_id))?;

        Ok(guild.map(Snowflake::new))
    }
}
