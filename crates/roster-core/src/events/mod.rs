//! Sync event kinds - the closed set of effects each outbox stream carries

mod sync_kind;

pub use sync_kind::{ChannelSyncKind, RoleSyncKind, SyncEventKind};
