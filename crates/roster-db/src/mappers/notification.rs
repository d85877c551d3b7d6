//! Notification column arrays for bulk insert

use roster_core::entities::NewNotification;
use uuid::Uuid;

/// Column-wise view of a notification batch, bound as `UNNEST` arrays
#[derive(Debug, Default)]
pub struct NotificationColumns {
    pub team_ids: Vec<Uuid>,
    pub user_ids: Vec<Uuid>,
    pub kinds: Vec<String>,
    pub titles: Vec<String>,
    pub bodies: Vec<String>,
}

impl NotificationColumns {
    pub fn new(notifications: &[NewNotification]) -> Self {
        let mut columns = Self {
            team_ids: Vec::with_capacity(notifications.len()),
            user_ids: Vec::with_capacity(notifications.len()),
            kinds: Vec::with_capacity(notifications.len()),
            titles: Vec::with_capacity(notifications.len()),
            bodies: Vec::with_capacity(notifications.len()),
        };
        for n in notifications {
            columns.team_ids.push(n.team_id);
            columns.user_ids.push(n.user_id);
            columns.kinds.push(n.kind.clone());
            columns.titles.push(n.title.clone());
            columns.bodies.push(n.body.clone());
        }
        columns
    }

    pub fn len(&self) -> usize {
        self.team_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.team_ids.is_empty()
    }
}
