//! Role stream: team roles mirrored as chat platform roles

use std::sync::Arc;

use async_trait::async_trait;

use roster_core::{ExternalGateway, RoleSyncKind, SyncEvent};

use super::{required_user, Dispatch, SyncHandler};
use crate::services::error::SyncError;
use crate::services::resolver::MappingResolver;
use crate::services::retry::RetryPolicy;

/// Action table for role sync events
#[derive(Clone)]
pub struct RoleSyncHandler {
    resolver: MappingResolver,
    gateway: Arc<dyn ExternalGateway>,
    retry: RetryPolicy,
}

impl RoleSyncHandler {
    pub fn new(resolver: MappingResolver, gateway: Arc<dyn ExternalGateway>, retry: RetryPolicy) -> Self {
        Self {
            resolver,
            gateway,
            retry,
        }
    }
}

#[async_trait]
impl SyncHandler for RoleSyncHandler {
    type Kind = RoleSyncKind;

    async fn dispatch(&self, event: &SyncEvent<RoleSyncKind>) -> Result<Dispatch, SyncError> {
        let guild_id = event.external_guild_id;

        match event.kind {
            RoleSyncKind::Created => {
                self.resolver
                    .ensure_mapping(
                        event.team_id,
                        event.subject_id,
                        guild_id,
                        event.subject_name.as_deref(),
                    )
                    .await?;
            }
            RoleSyncKind::Deleted => {
                let Some(role_id) = self
                    .resolver
                    .find_external(event.team_id, event.subject_id)
                    .await?
                else {
                    return Ok(Dispatch::Skipped("role was never mapped"));
                };
                self.retry
                    .run("delete_role", || self.gateway.delete_role(guild_id, role_id))
                    .await?;
            }
            RoleSyncKind::Assigned => {
                let user_id = required_user(event)?;
                let role_id = self
                    .resolver
                    .ensure_mapping(
                        event.team_id,
                        event.subject_id,
                        guild_id,
                        event.subject_name.as_deref(),
                    )
                    .await?;
                self.retry
                    .run("grant_role", || self.gateway.grant_role(guild_id, user_id, role_id))
                    .await?;
            }
            RoleSyncKind::Unassigned => {
                let user_id = required_user(event)?;
                let Some(role_id) = self
                    .resolver
                    .find_external(event.team_id, event.subject_id)
                    .await?
                else {
                    return Ok(Dispatch::Skipped("role was never mapped"));
                };
                self.retry
                    .run("revoke_role", || self.gateway.revoke_role(guild_id, user_id, role_id))
                    .await?;
            }
        }

        Ok(Dispatch::Applied)
    }
}
