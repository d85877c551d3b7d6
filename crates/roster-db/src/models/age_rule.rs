//! Age threshold rule database model

use sqlx::FromRow;
use uuid::Uuid;

/// `age_threshold_rules` row joined with its role name
#[derive(Debug, Clone, FromRow)]
pub struct AgeRuleModel {
    pub id: Uuid,
    pub team_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}
