//! PostgreSQL implementation of OutboxRepository
//!
//! One table per stream: `role_sync_events` and `channel_sync_events`,
//! picked from the kind's `STREAM` name.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use roster_core::entities::{NewSyncEvent, SyncEvent};
use roster_core::events::SyncEventKind;
use roster_core::traits::{OutboxRepository, RepoResult};

use crate::mappers::{sync_events, SyncEventInsert};
use crate::models::SyncEventModel;

use super::error::map_db_error;

const EVENT_COLUMNS: &str = "id, team_id, external_guild_id, event_type, subject_id, subject_name, \
     member_id, external_user_id, created_at, processed_at, error";

/// PostgreSQL implementation of OutboxRepository for stream `K`
pub struct PgOutboxRepository<K> {
    pool: PgPool,
    table: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K: SyncEventKind> PgOutboxRepository<K> {
    /// Create a new PgOutboxRepository
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: table_name::<K>(),
            _kind: PhantomData,
        }
    }
}

impl<K> Clone for PgOutboxRepository<K> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _kind: PhantomData,
        }
    }
}

/// Table backing a stream
pub fn table_name<K: SyncEventKind>() -> String {
    format!("{}_events", K::STREAM)
}

#[async_trait]
impl<K: SyncEventKind> OutboxRepository<K> for PgOutboxRepository<K> {
    #[instrument(skip(self, event), fields(stream = K::STREAM, kind = %event.kind))]
    async fn append(&self, event: &NewSyncEvent<K>) -> RepoResult<i64> {
        let insert = SyncEventInsert::new(event);

        let id = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            INSERT INTO {} (team_id, external_guild_id, event_type, subject_id, subject_name,
                            member_id, external_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
            self.table
        ))
        .bind(insert.team_id)
        .bind(insert.external_guild_id)
        .bind(insert.event_type)
        .bind(insert.subject_id)
        .bind(insert.subject_name)
        .bind(insert.member_id)
        .bind(insert.external_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        debug!(event_id = id, "Appended sync event");
        Ok(id)
    }

    #[instrument(skip(self), fields(stream = K::STREAM))]
    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<SyncEvent<K>>> {
        let results = sqlx::query_as::<_, SyncEventModel>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM {}
            WHERE processed_at IS NULL
            ORDER BY created_at ASC, id ASC
            LIMIT $1
            "#,
            self.table
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        sync_events(results)
    }

    #[instrument(skip(self), fields(stream = K::STREAM))]
    async fn claim_pending(
        &self,
        limit: i64,
        claimant: &str,
        lease: Duration,
    ) -> RepoResult<Vec<SyncEvent<K>>> {
        let mut results = sqlx::query_as::<_, SyncEventModel>(&format!(
            r#"
            UPDATE {table}
            SET claimed_by = $2, claimed_at = NOW()
            WHERE id IN (
                SELECT id
                FROM {table}
                WHERE processed_at IS NULL
                  AND (claimed_at IS NULL OR claimed_at < NOW() - make_interval(secs => $3))
                ORDER BY created_at ASC, id ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {EVENT_COLUMNS}
            "#,
            table = self.table
        ))
        .bind(limit)
        .bind(claimant)
        .bind(lease.as_secs_f64())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // RETURNING does not preserve the subquery order
        results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        sync_events(results)
    }

    #[instrument(skip(self), fields(stream = K::STREAM))]
    async fn mark_processed(&self, id: i64) -> RepoResult<()> {
        sqlx::query(&format!(
            r#"
            UPDATE {}
            SET processed_at = NOW(), error = NULL
            WHERE id = $1 AND processed_at IS NULL
            "#,
            self.table
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(stream = K::STREAM))]
    async fn mark_failed(&self, id: i64, error: &str) -> RepoResult<()> {
        sqlx::query(&format!(
            r#"
            UPDATE {}
            SET processed_at = NOW(), error = $2
            WHERE id = $1 AND processed_at IS NULL
            "#,
            self.table
        ))
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(stream = K::STREAM))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<SyncEvent<K>>> {
        let result = sqlx::query_as::<_, SyncEventModel>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM {}
            WHERE id = $1
            "#,
            self.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(SyncEvent::try_from).transpose()
    }
}
