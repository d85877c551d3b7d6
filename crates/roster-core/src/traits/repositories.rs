//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{AgeThresholdRule, Mapping, MemberSnapshot, NewNotification, NewSyncEvent, SyncEvent};
use crate::error::DomainError;
use crate::events::SyncEventKind;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Outbox Repository
// ============================================================================

/// Append-only log of pending sync events for one stream
#[async_trait]
pub trait OutboxRepository<K: SyncEventKind>: Send + Sync {
    /// Append a new pending event, returning its id
    async fn append(&self, event: &NewSyncEvent<K>) -> RepoResult<i64>;

    /// Pending events ordered by `created_at`, then id, capped at `limit`
    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<SyncEvent<K>>>;

    /// Atomically claim pending events for one worker
    ///
    /// Skips events claimed by someone else within the last `lease`.
    async fn claim_pending(
        &self,
        limit: i64,
        claimant: &str,
        lease: Duration,
    ) -> RepoResult<Vec<SyncEvent<K>>>;

    /// Mark an event as successfully processed (no-op if already terminal)
    async fn mark_processed(&self, id: i64) -> RepoResult<()>;

    /// Mark an event as failed (no-op if already terminal)
    async fn mark_failed(&self, id: i64, error: &str) -> RepoResult<()>;

    /// Find event by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<SyncEvent<K>>>;
}

// ============================================================================
// Mapping Repository
// ============================================================================

/// Internal id ↔ external id links, unique per `(team_id, internal_id)`
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Find the mapping for an internal entity
    async fn find(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<Option<Mapping>>;

    /// Create or repoint the mapping (last write wins)
    async fn upsert(&self, team_id: Uuid, internal_id: Uuid, external_id: Snowflake) -> RepoResult<()>;

    /// Remove the mapping if present
    async fn delete(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Team Repository
// ============================================================================

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Chat platform guild linked to the team, if any
    async fn find_external_guild(&self, team_id: Uuid) -> RepoResult<Option<Snowflake>>;
}

// ============================================================================
// Age Rule Repository
// ============================================================================

#[async_trait]
pub trait AgeRuleRepository: Send + Sync {
    /// All age threshold rules of a team
    async fn find_by_team(&self, team_id: Uuid) -> RepoResult<Vec<AgeThresholdRule>>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Snapshot of all active members of a team
    async fn snapshot(&self, team_id: Uuid) -> RepoResult<Vec<MemberSnapshot>>;

    /// Give a role to a member (no-op if already held)
    async fn assign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()>;

    /// Take a role away from a member (no-op if not held)
    async fn unassign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert all notifications in one statement, returning the row count
    async fn insert_many(&self, notifications: &[NewNotification]) -> RepoResult<u64>;
}
