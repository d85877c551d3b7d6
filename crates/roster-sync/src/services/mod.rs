//! Sync engine services
//!
//! Consumer side (processors and their handlers, mapping resolver, retry),
//! producer side (outbox recorder) and the age reconciliation engine.

pub mod context;
pub mod error;
pub mod handlers;
pub mod processor;
pub mod reconciliation;
pub mod recorder;
pub mod resolver;
pub mod retry;

// Re-export all services for convenience
pub use context::{SyncContext, SyncContextBuilder};
pub use error::{ServiceError, ServiceResult, SyncError};
pub use handlers::{ChannelSyncHandler, Dispatch, RoleSyncHandler, SyncHandler};
pub use processor::{ClaimConfig, ProcessorConfig, SyncProcessor, TickReport};
pub use reconciliation::{compute_changes, AgeReconciliationService};
pub use recorder::{OutboxRecorder, Recorded};
pub use resolver::{channel_name, MappingResolver, MAX_CHANNEL_NAME_LEN};
pub use retry::RetryPolicy;
