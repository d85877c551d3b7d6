//! # roster-core
//!
//! Domain layer of the chat platform sync engine: outbox events, id mappings,
//! age threshold rules, and the ports (repositories, external gateway) the
//! engine depends on. This crate has zero dependencies on infrastructure.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    age_in, AgeThresholdRule, ChangeAction, ExternalResource, Mapping, MemberSnapshot,
    NewNotification, NewSyncEvent, OverwriteTarget, PermissionOverwrite, RoleChange, SyncEvent,
    AGE_ROLE_CHANGE,
};
pub use error::DomainError;
pub use events::{ChannelSyncKind, RoleSyncKind, SyncEventKind};
pub use traits::{
    AgeRuleRepository, ExternalGateway, GatewayError, GatewayResult, MappingRepository,
    MemberRepository, NotificationRepository, OutboxRepository, RepoResult, TeamRepository,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
