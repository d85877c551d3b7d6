//! Member snapshot - the slice of a team member the age engine reads

use uuid::Uuid;

use super::age_rule::age_in;
use crate::value_objects::Snowflake;

/// Active team member as seen at the start of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub member_id: Uuid,
    /// Linked user account, if any (notification recipient for admins)
    pub user_id: Option<Uuid>,
    pub display_name: String,
    pub birth_year: Option<i32>,
    pub role_ids: Vec<Uuid>,
    pub is_admin: bool,
    /// Chat platform user, if the member linked one
    pub external_user_id: Option<Snowflake>,
}

impl MemberSnapshot {
    /// Create a snapshot with no roles
    pub fn new(member_id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            member_id,
            user_id: None,
            display_name: display_name.into(),
            birth_year: None,
            role_ids: Vec::new(),
            is_admin: false,
            external_user_id: None,
        }
    }

    /// Check if member currently holds a role
    #[inline]
    pub fn has_role(&self, role_id: Uuid) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Age in the reference year, if the birth year is known
    pub fn age_in(&self, reference_year: i32) -> Option<i32> {
        self.birth_year.map(|year| age_in(reference_year, year))
    }
}
