//! Outbox recorder - producer side of the sync streams
//!
//! Mutation handlers call these after their primary write. Nothing here
//! returns an error: outcomes are reported as [`Recorded`], which callers
//! are free to ignore. Failures are logged here.

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use roster_core::{
    ChannelSyncKind, NewSyncEvent, OutboxRepository, RoleSyncKind, Snowflake, SyncEventKind,
};

use super::context::SyncContext;

/// Best-effort outcome of recording an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// Appended with this id
    Appended(i64),
    /// Team has no linked guild; nothing to sync
    Skipped,
    /// Lookup or append failed (already logged)
    Failed(String),
}

impl Recorded {
    pub fn is_appended(&self) -> bool {
        matches!(self, Self::Appended(_))
    }
}

/// Appends sync events for team mutations
pub struct OutboxRecorder<'a> {
    ctx: &'a SyncContext,
}

impl<'a> OutboxRecorder<'a> {
    /// Create a new OutboxRecorder
    pub fn new(ctx: &'a SyncContext) -> Self {
        Self { ctx }
    }

    // === Role stream ===

    pub async fn role_created(&self, team_id: Uuid, role_id: Uuid, name: &str) -> Recorded {
        self.record_role(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, RoleSyncKind::Created, role_id).with_subject_name(name)
        })
        .await
    }

    pub async fn role_deleted(&self, team_id: Uuid, role_id: Uuid) -> Recorded {
        self.record_role(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, RoleSyncKind::Deleted, role_id)
        })
        .await
    }

    pub async fn role_assigned(
        &self,
        team_id: Uuid,
        role_id: Uuid,
        role_name: &str,
        member_id: Uuid,
        external_user_id: Option<Snowflake>,
    ) -> Recorded {
        self.record_role(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, RoleSyncKind::Assigned, role_id)
                .with_subject_name(role_name)
                .with_member(member_id, external_user_id)
        })
        .await
    }

    pub async fn role_unassigned(
        &self,
        team_id: Uuid,
        role_id: Uuid,
        member_id: Uuid,
        external_user_id: Option<Snowflake>,
    ) -> Recorded {
        self.record_role(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, RoleSyncKind::Unassigned, role_id)
                .with_member(member_id, external_user_id)
        })
        .await
    }

    // === Channel stream ===

    pub async fn subgroup_created(&self, team_id: Uuid, subgroup_id: Uuid, name: &str) -> Recorded {
        self.record_channel(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, ChannelSyncKind::Created, subgroup_id)
                .with_subject_name(name)
        })
        .await
    }

    pub async fn subgroup_deleted(&self, team_id: Uuid, subgroup_id: Uuid) -> Recorded {
        self.record_channel(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, ChannelSyncKind::Deleted, subgroup_id)
        })
        .await
    }

    pub async fn subgroup_member_added(
        &self,
        team_id: Uuid,
        subgroup_id: Uuid,
        subgroup_name: &str,
        member_id: Uuid,
        external_user_id: Option<Snowflake>,
    ) -> Recorded {
        self.record_channel(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, ChannelSyncKind::MemberAdded, subgroup_id)
                .with_subject_name(subgroup_name)
                .with_member(member_id, external_user_id)
        })
        .await
    }

    pub async fn subgroup_member_removed(
        &self,
        team_id: Uuid,
        subgroup_id: Uuid,
        member_id: Uuid,
        external_user_id: Option<Snowflake>,
    ) -> Recorded {
        self.record_channel(team_id, |guild| {
            NewSyncEvent::new(team_id, guild, ChannelSyncKind::MemberRemoved, subgroup_id)
                .with_member(member_id, external_user_id)
        })
        .await
    }

    /// Append a role event whose guild is already known
    pub async fn append_role(&self, event: &NewSyncEvent<RoleSyncKind>) -> Recorded {
        append(self.ctx.role_outbox(), event).await
    }

    async fn record_role<F>(&self, team_id: Uuid, build: F) -> Recorded
    where
        F: FnOnce(Snowflake) -> NewSyncEvent<RoleSyncKind> + Send,
    {
        match self.linked_guild(team_id).await {
            Ok(Some(guild)) => append(self.ctx.role_outbox(), &build(guild)).await,
            Ok(None) => Recorded::Skipped,
            Err(reason) => Recorded::Failed(reason),
        }
    }

    async fn record_channel<F>(&self, team_id: Uuid, build: F) -> Recorded
    where
        F: FnOnce(Snowflake) -> NewSyncEvent<ChannelSyncKind> + Send,
    {
        match self.linked_guild(team_id).await {
            Ok(Some(guild)) => append(self.ctx.channel_outbox(), &build(guild)).await,
            Ok(None) => Recorded::Skipped,
            Err(reason) => Recorded::Failed(reason),
        }
    }

    /// Guild gate, checked once at append time
    async fn linked_guild(&self, team_id: Uuid) -> Result<Option<Snowflake>, String> {
        match self.ctx.team_repo().find_external_guild(team_id).await {
            Ok(Some(guild)) => Ok(Some(guild)),
            Ok(None) => {
                debug!(team_id = %team_id, "Team has no linked guild, not recording");
                Ok(None)
            }
            Err(e) => {
                warn!(team_id = %team_id, error = %e, "Could not check guild link");
                Err(e.to_string())
            }
        }
    }
}

#[instrument(skip(outbox, event), fields(stream = K::STREAM, kind = %event.kind, team_id = %event.team_id))]
async fn append<K: SyncEventKind>(
    outbox: &dyn OutboxRepository<K>,
    event: &NewSyncEvent<K>,
) -> Recorded {
    match outbox.append(event).await {
        Ok(id) => Recorded::Appended(id),
        Err(e) => {
            warn!(error = %e, "Failed to record sync event");
            Recorded::Failed(e.to_string())
        }
    }
}
