//! External gateway port - the chat platform as seen by the engine
//!
//! Implementations are expected to give delete/revoke calls
//! delete-if-exists semantics.

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::PermissionOverwrite;
use crate::value_objects::{Permissions, Snowflake};

/// Errors reported by the chat platform client
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Rate limited, retry after {retry_after_ms} ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }

    /// Wait the platform asked for, if any
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait ExternalGateway: Send + Sync {
    /// Create a role in a guild, returning its id
    async fn create_role(&self, guild_id: Snowflake, name: &str) -> GatewayResult<Snowflake>;

    /// Delete a role from a guild
    async fn delete_role(&self, guild_id: Snowflake, role_id: Snowflake) -> GatewayResult<()>;

    /// Give a guild member a role
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()>;

    /// Take a role away from a guild member
    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()>;

    /// Create a text channel with initial permission overwrites, returning its id
    async fn create_channel(
        &self,
        guild_id: Snowflake,
        name: &str,
        overwrites: &[PermissionOverwrite],
    ) -> GatewayResult<Snowflake>;

    /// Delete a channel
    async fn delete_channel(&self, channel_id: Snowflake) -> GatewayResult<()>;

    /// Set a member permission overwrite on a channel
    async fn grant_channel_access(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        allow: Permissions,
    ) -> GatewayResult<()>;

    /// Remove a member permission overwrite from a channel
    async fn revoke_channel_access(&self, channel_id: Snowflake, user_id: Snowflake) -> GatewayResult<()>;
}
