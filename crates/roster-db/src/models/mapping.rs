//! Mapping database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model shared by the `*_mappings` tables
#[derive(Debug, Clone, FromRow)]
pub struct MappingModel {
    pub id: i64,
    pub team_id: Uuid,
    pub internal_id: Uuid,
    pub external_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
