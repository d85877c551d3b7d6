//! Sync event entity - one intended effect on the chat platform

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::events::SyncEventKind;
use crate::value_objects::Snowflake;

/// Outbox row, generic over the stream's event kind
///
/// `processed_at == None` means the event is pending. Once it is set the
/// event is terminal; `error` tells failure from success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent<K> {
    pub id: i64,
    pub team_id: Uuid,
    pub external_guild_id: Snowflake,
    pub kind: K,
    /// Role id or subgroup id
    pub subject_id: Uuid,
    /// Needed when the external resource must be created
    pub subject_name: Option<String>,
    pub member_id: Option<Uuid>,
    pub external_user_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl<K: SyncEventKind> SyncEvent<K> {
    /// Eligible for polling
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.processed_at.is_none()
    }

    /// Terminal events are never reprocessed
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.processed_at.is_some()
    }

    /// Terminal with an error recorded
    #[inline]
    pub fn has_failed(&self) -> bool {
        self.is_terminal() && self.error.is_some()
    }
}

/// Event as appended by a mutation handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSyncEvent<K> {
    pub team_id: Uuid,
    pub external_guild_id: Snowflake,
    pub kind: K,
    pub subject_id: Uuid,
    pub subject_name: Option<String>,
    pub member_id: Option<Uuid>,
    pub external_user_id: Option<Snowflake>,
}

impl<K: SyncEventKind> NewSyncEvent<K> {
    /// Create an event about a subject (role or subgroup)
    pub fn new(team_id: Uuid, external_guild_id: Snowflake, kind: K, subject_id: Uuid) -> Self {
        Self {
            team_id,
            external_guild_id,
            kind,
            subject_id,
            subject_name: None,
            member_id: None,
            external_user_id: None,
        }
    }

    /// Attach the subject's display name
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = Some(name.into());
        self
    }

    /// Attach the member the event is about
    pub fn with_member(mut self, member_id: Uuid, external_user_id: Option<Snowflake>) -> Self {
        self.member_id = Some(member_id);
        self.external_user_id = external_user_id;
        self
    }
}
