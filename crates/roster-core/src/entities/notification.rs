//! Notification record handed to the notification store

use uuid::Uuid;

/// Notification type written for age-based role changes
pub const AGE_ROLE_CHANGE: &str = "age_role_change";

/// One notification row to bulk insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub team_id: Uuid,
    pub user_id: Uuid,
    /// Stored in the `type` column
    pub kind: String,
    pub title: String,
    pub body: String,
}
