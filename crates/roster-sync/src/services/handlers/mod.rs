//! Per-stream action tables
//!
//! Each handler matches exhaustively on its stream's closed kind enum.

mod channel;
mod role;

use async_trait::async_trait;

use roster_core::{Snowflake, SyncEvent, SyncEventKind};

use super::error::SyncError;

pub use channel::ChannelSyncHandler;
pub use role::RoleSyncHandler;

/// Outcome of a successfully handled event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The external effect was performed
    Applied,
    /// Nothing to do: the resource was never mapped
    Skipped(&'static str),
}

/// Applies one event of a stream to the chat platform
#[async_trait]
pub trait SyncHandler: Send + Sync {
    type Kind: SyncEventKind;

    async fn dispatch(&self, event: &SyncEvent<Self::Kind>) -> Result<Dispatch, SyncError>;
}

/// External user id, required by membership events
pub(crate) fn required_user<K>(event: &SyncEvent<K>) -> Result<Snowflake, SyncError> {
    event
        .external_user_id
        .ok_or(SyncError::missing_field("external_user_id"))
}
