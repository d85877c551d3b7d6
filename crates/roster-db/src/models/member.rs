//! Member database model

use sqlx::FromRow;
use uuid::Uuid;

/// Active member row with its role ids aggregated
#[derive(Debug, Clone, FromRow)]
pub struct MemberSnapshotModel {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub display_name: String,
    pub birth_year: Option<i32>,
    pub is_admin: bool,
    pub discord_user_id: Option<i64>,
    pub role_ids: Vec<Uuid>,
}
