//! Sync event database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model shared by the `*_sync_events` tables
#[derive(Debug, Clone, FromRow)]
pub struct SyncEventModel {
    pub id: i64,
    pub team_id: Uuid,
    pub external_guild_id: i64,
    pub event_type: String,
    pub subject_id: Uuid,
    pub subject_name: Option<String>,
    pub member_id: Option<Uuid>,
    pub external_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}
