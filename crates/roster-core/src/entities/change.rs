//! Role change - one line of a reconciliation diff

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Direction of a role change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Assigned,
    Removed,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produced and consumed within one reconciliation run, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoleChange {
    pub member_id: Uuid,
    pub role_id: Uuid,
    pub action: ChangeAction,
}

impl RoleChange {
    pub fn assigned(member_id: Uuid, role_id: Uuid) -> Self {
        Self {
            member_id,
            role_id,
            action: ChangeAction::Assigned,
        }
    }

    pub fn removed(member_id: Uuid, role_id: Uuid) -> Self {
        Self {
            member_id,
            role_id,
            action: ChangeAction::Removed,
        }
    }
}
