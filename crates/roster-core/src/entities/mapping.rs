//! Mapping entity - links an internal entity to its chat platform counterpart

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::Snowflake;

/// At most one mapping exists per `(team_id, internal_id)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub team_id: Uuid,
    /// Role id or subgroup id
    pub internal_id: Uuid,
    /// Role id or channel id on the chat platform
    pub external_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which external resource a mapping points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalResource {
    Role,
    Channel,
}

impl ExternalResource {
    /// Name used when the internal entity has none
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            Self::Role => "Unnamed role",
            Self::Channel => "unnamed-subgroup",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Channel => "channel",
        }
    }
}

impl std::fmt::Display for ExternalResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
