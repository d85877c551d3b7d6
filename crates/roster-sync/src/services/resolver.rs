//! Mapping resolver - get-or-create of external resources
//!
//! Not guarded against concurrent creators: two resolvers racing on the same
//! key may both create, and the later upsert repoints the mapping.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use roster_core::{
    ExternalGateway, ExternalResource, MappingRepository, PermissionOverwrite, Snowflake,
};

use super::error::SyncError;
use super::retry::RetryPolicy;

/// Longest channel name the platform accepts
pub const MAX_CHANNEL_NAME_LEN: usize = 100;

/// Resolves internal ids to external ids for one resource kind
#[derive(Clone)]
pub struct MappingResolver {
    mappings: Arc<dyn MappingRepository>,
    gateway: Arc<dyn ExternalGateway>,
    resource: ExternalResource,
    retry: RetryPolicy,
}

impl MappingResolver {
    /// Create a new MappingResolver
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        gateway: Arc<dyn ExternalGateway>,
        resource: ExternalResource,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            mappings,
            gateway,
            resource,
            retry,
        }
    }

    /// Resource kind this resolver creates
    pub fn resource(&self) -> ExternalResource {
        self.resource
    }

    /// Existing external id, without creating anything
    pub async fn find_external(
        &self,
        team_id: Uuid,
        internal_id: Uuid,
    ) -> Result<Option<Snowflake>, SyncError> {
        let mapping = self.mappings.find(team_id, internal_id).await?;
        Ok(mapping.map(|m| m.external_id))
    }

    /// Return the external id, creating the resource and mapping if absent
    #[instrument(skip(self, display_name), fields(resource = %self.resource))]
    pub async fn ensure_mapping(
        &self,
        team_id: Uuid,
        internal_id: Uuid,
        guild_id: Snowflake,
        display_name: Option<&str>,
    ) -> Result<Snowflake, SyncError> {
        if let Some(external_id) = self.find_external(team_id, internal_id).await? {
            debug!(external_id = %external_id, "Mapping found");
            return Ok(external_id);
        }

        let name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.resource.placeholder_name());

        let external_id = match self.resource {
            ExternalResource::Role => {
                self.retry
                    .run("create_role", || self.gateway.create_role(guild_id, name))
                    .await?
            }
            ExternalResource::Channel => {
                let name = channel_name(name);
                let overwrites = [PermissionOverwrite::private_channel(guild_id)];
                self.retry
                    .run("create_channel", || {
                        self.gateway.create_channel(guild_id, &name, &overwrites)
                    })
                    .await?
            }
        };

        self.mappings.upsert(team_id, internal_id, external_id).await?;

        info!(external_id = %external_id, name, "Created external resource");
        Ok(external_id)
    }
}

/// Platform-safe channel name: lowercase, whitespace runs become `-`
pub fn channel_name(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    let slug: String = slug.chars().take(MAX_CHANNEL_NAME_LEN).collect();
    if slug.is_empty() {
        ExternalResource::Channel.placeholder_name().to_string()
    } else {
        slug
    }
}
