//! Sync event entity <-> model mapper

use roster_core::entities::{NewSyncEvent, SyncEvent};
use roster_core::error::DomainError;
use roster_core::events::SyncEventKind;
use roster_core::value_objects::Snowflake;

use crate::models::SyncEventModel;

/// Convert a row into an event of stream `K`
///
/// Fails when `event_type` is not a kind of that stream.
impl<K: SyncEventKind> TryFrom<SyncEventModel> for SyncEvent<K> {
    type Error = DomainError;

    fn try_from(model: SyncEventModel) -> Result<Self, Self::Error> {
        let kind = K::parse(&model.event_type).ok_or_else(|| DomainError::InvalidEventKind {
            stream: K::STREAM,
            value: model.event_type.clone(),
        })?;

        Ok(SyncEvent {
            id: model.id,
            team_id: model.team_id,
            external_guild_id: Snowflake::new(model.external_guild_id),
            kind,
            subject_id: model.subject_id,
            subject_name: model.subject_name,
            member_id: model.member_id,
            external_user_id: model.external_user_id.map(Snowflake::new),
            created_at: model.created_at,
            processed_at: model.processed_at,
            error: model.error,
        })
    }
}

/// Values for inserting a new event
pub struct SyncEventInsert<'a> {
    pub team_id: uuid::Uuid,
    pub external_guild_id: i64,
    pub event_type: &'static str,
    pub subject_id: uuid::Uuid,
    pub subject_name: Option<&'a str>,
    pub member_id: Option<uuid::Uuid>,
    pub external_user_id: Option<i64>,
}

impl<'a> SyncEventInsert<'a> {
    pub fn new<K: SyncEventKind>(event: &'a NewSyncEvent<K>) -> Self {
        Self {
            team_id: event.team_id,
            external_guild_id: event.external_guild_id.into_inner(),
            event_type: event.kind.as_str(),
            subject_id: event.subject_id,
            subject_name: event.subject_name.as_deref(),
            member_id: event.member_id,
            external_user_id: event.external_user_id.map(Snowflake::into_inner),
        }
    }
}

/// Decode rows, failing on the first unknown kind
pub fn sync_events<K: SyncEventKind>(
    models: Vec<SyncEventModel>,
) -> Result<Vec<SyncEvent<K>>, DomainError> {
    models.into_iter().map(SyncEvent::try_from).collect()
}
