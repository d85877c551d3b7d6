//! Event kinds for the two outbox streams
//!
//! Each stream has its own closed enum so the processors can match
//! exhaustively. Kinds are persisted as lowercase snake_case strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour shared by the per-stream event kind enums
pub trait SyncEventKind:
    Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Name of the outbox stream this kind belongs to
    const STREAM: &'static str;

    /// Every variant, in declaration order
    const ALL: &'static [Self];

    /// Persisted string form
    fn as_str(&self) -> &'static str;

    /// Parse the persisted string form
    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }
}

// ============================================================================
// Role stream
// ============================================================================

/// Effects of role mutations on the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSyncKind {
    /// A team role was created
    Created,
    /// A team role was deleted
    Deleted,
    /// A role was assigned to a member
    Assigned,
    /// A role was taken away from a member
    Unassigned,
}

impl SyncEventKind for RoleSyncKind {
    const STREAM: &'static str = "role_sync";
    const ALL: &'static [Self] = &[Self::Created, Self::Deleted, Self::Assigned, Self::Unassigned];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for RoleSyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Channel (subgroup) stream
// ============================================================================

/// Effects of subgroup mutations on the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSyncKind {
    /// A subgroup was created
    Created,
    /// A subgroup was deleted
    Deleted,
    /// A member joined a subgroup
    MemberAdded,
    /// A member left a subgroup
    MemberRemoved,
}

impl SyncEventKind for ChannelSyncKind {
    const STREAM: &'static str = "channel_sync";
    const ALL: &'static [Self] = &[
        Self::Created,
        Self::Deleted,
        Self::MemberAdded,
        Self::MemberRemoved,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Deleted => "deleted",
            Self::MemberAdded => "member_added",
            Self::MemberRemoved => "member_removed",
        }
    }
}

impl fmt::Display for ChannelSyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
