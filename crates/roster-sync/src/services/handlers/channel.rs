//! Channel stream: subgroups mirrored as private text channels

use std::sync::Arc;

use async_trait::async_trait;

use roster_core::{ChannelSyncKind, ExternalGateway, Permissions, SyncEvent};

use super::{required_user, Dispatch, SyncHandler};
use crate::services::error::SyncError;
use crate::services::resolver::MappingResolver;
use crate::services::retry::RetryPolicy;

/// Action table for subgroup channel sync events
#[derive(Clone)]
pub struct ChannelSyncHandler {
    resolver: MappingResolver,
    gateway: Arc<dyn ExternalGateway>,
    retry: RetryPolicy,
}

impl ChannelSyncHandler {
    pub fn new(resolver: MappingResolver, gateway: Arc<dyn ExternalGateway>, retry: RetryPolicy) -> Self {
        Self {
            resolver,
            gateway,
            retry,
        }
    }
}

#[async_trait]
impl SyncHandler for ChannelSyncHandler {
    type Kind = ChannelSyncKind;

    async fn dispatch(&self, event: &SyncEvent<ChannelSyncKind>) -> Result<Dispatch, SyncError> {
        match event.kind {
            ChannelSyncKind::Created => {
                self.resolver
                    .ensure_mapping(
                        event.team_id,
                        event.subject_id,
                        event.external_guild_id,
                        event.subject_name.as_deref(),
                    )
                    .await?;
            }
            ChannelSyncKind::Deleted => {
                let Some(channel_id) = self
                    .resolver
                    .find_external(event.team_id, event.subject_id)
                    .await?
                else {
                    return Ok(Dispatch::Skipped("subgroup has no channel"));
                };
                self.retry
                    .run("delete_channel", || self.gateway.delete_channel(channel_id))
                    .await?;
            }
            ChannelSyncKind::MemberAdded => {
                let user_id = required_user(event)?;
                let channel_id = self
                    .resolver
                    .ensure_mapping(
                        event.team_id,
                        event.subject_id,
                        event.external_guild_id,
                        event.subject_name.as_deref(),
                    )
                    .await?;
                self.retry
                    .run("grant_channel_access", || {
                        self.gateway
                            .grant_channel_access(channel_id, user_id, Permissions::MEMBER_ACCESS)
                    })
                    .await?;
            }
            ChannelSyncKind::MemberRemoved => {
                let user_id = required_user(event)?;
                let Some(channel_id) = self
                    .resolver
                    .find_external(event.team_id, event.subject_id)
                    .await?
                else {
                    return Ok(Dispatch::Skipped("subgroup has no channel"));
                };
                self.retry
                    .run("revoke_channel_access", || {
                        self.gateway.revoke_channel_access(channel_id, user_id)
                    })
                    .await?;
            }
        }

        Ok(Dispatch::Applied)
    }
}
