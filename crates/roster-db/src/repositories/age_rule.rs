//! PostgreSQL implementation of AgeRuleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use roster_core::entities::AgeThresholdRule;
use roster_core::traits::{AgeRuleRepository, RepoResult};

use crate::models::AgeRuleModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AgeRuleRepository
#[derive(Clone)]
pub struct PgAgeRuleRepository {
    pool: PgPool,
}

impl PgAgeRuleRepository {
    /// Create a new PgAgeRuleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgeRuleRepository for PgAgeRuleRepository {
    #[instrument(skip(self))]
    async fn find_by_team(&self, team_id: Uuid) -> RepoResult<Vec<AgeThresholdRule>> {
        let results = sqlx::query_as::<_, AgeRuleModel>(
            r#"
            SELECT r.id, r.team_id, r.role_id, ro.name AS role_name, r.min_age, r.max_age
            FROM age_threshold_rules r
            JOIN roles ro ON ro.id = r.role_id
            WHERE r.team_id = $1
            ORDER BY ro.name ASC, r.id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(AgeThresholdRule::from).collect())
    }
}
