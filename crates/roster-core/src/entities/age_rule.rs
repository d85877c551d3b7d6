//! Age threshold rule - role membership as a function of age

use uuid::Uuid;

/// Members whose age falls in `[min_age, max_age]` should hold `role_id`
///
/// Both bounds are inclusive; an absent bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeThresholdRule {
    pub id: Uuid,
    pub team_id: Uuid,
    pub role_id: Uuid,
    /// Role name, joined in for notifications and outbox events
    pub role_name: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl AgeThresholdRule {
    /// Check whether an age satisfies both bounds
    pub fn matches(&self, age: i32) -> bool {
        let min_ok = self.min_age.is_none_or(|min| age >= min);
        let max_ok = self.max_age.is_none_or(|max| age <= max);
        min_ok && max_ok
    }
}

/// Age from whole birth years only
#[inline]
pub fn age_in(reference_year: i32, birth_year: i32) -> i32 {
    reference_year.saturating_sub(birth_year)
}
