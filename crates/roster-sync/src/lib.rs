//! # roster-sync
//!
//! Application layer of the sync engine: keeps chat platform roles,
//! channels and memberships eventually consistent with the team roster,
//! and reconciles age-based roles.

pub mod services;

pub use services::{
    channel_name, compute_changes, AgeReconciliationService, ChannelSyncHandler, ClaimConfig,
    Dispatch, MappingResolver, OutboxRecorder, ProcessorConfig, Recorded, RetryPolicy,
    RoleSyncHandler, ServiceError, ServiceResult, SyncContext, SyncContextBuilder, SyncError,
    SyncHandler, SyncProcessor, TickReport,
};
