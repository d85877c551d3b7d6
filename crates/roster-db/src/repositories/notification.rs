//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use roster_core::entities::NewNotification;
use roster_core::traits::{NotificationRepository, RepoResult};

use crate::mappers::NotificationColumns;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notifications), fields(count = notifications.len()))]
    async fn insert_many(&self, notifications: &[NewNotification]) -> RepoResult<u64> {
        let columns = NotificationColumns::new(notifications);
        if columns.is_empty() {
            return Ok(0);
        }

        // Single statement for the whole batch
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (team_id, user_id, type, title, body, created_at)
            SELECT team_id, user_id, type, title, body, NOW()
            FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::text[], $5::text[])
                AS t(team_id, user_id, type, title, body)
            "#,
        )
        .bind(&columns.team_ids)
        .bind(&columns.user_ids)
        .bind(&columns.kinds)
        .bind(&columns.titles)
        .bind(&columns.bodies)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
