//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use roster_core::entities::MemberSnapshot;
use roster_core::traits::{MemberRepository, RepoResult};

use crate::models::MemberSnapshotModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn snapshot(&self, team_id: Uuid) -> RepoResult<Vec<MemberSnapshot>> {
        let results = sqlx::query_as::<_, MemberSnapshotModel>(
            r#"
            SELECT m.id, m.user_id, m.display_name, m.birth_year, m.is_admin, m.discord_user_id,
                   COALESCE(
                       array_agg(mr.role_id ORDER BY mr.role_id) FILTER (WHERE mr.role_id IS NOT NULL),
                       '{}'
                   ) AS role_ids
            FROM members m
            LEFT JOIN member_roles mr ON mr.member_id = m.id
            WHERE m.team_id = $1 AND m.active = TRUE
            GROUP BY m.id
            ORDER BY m.display_name ASC, m.id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MemberSnapshot::from).collect())
    }

    #[instrument(skip(self))]
    async fn assign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member_roles (member_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(member_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unassign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM member_roles
            WHERE member_id = $1 AND role_id = $2
            "#,
        )
        .bind(member_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
