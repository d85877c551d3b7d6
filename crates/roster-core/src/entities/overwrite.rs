//! Channel permission overwrite - per-role or per-member allow/deny bits

use serde::{Serialize, Serializer};

use crate::value_objects::{Permissions, Snowflake};

/// What an overwrite applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteTarget {
    Role,
    Member,
}

// The platform encodes the target as 0 (role) or 1 (member)
impl Serialize for OverwriteTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(match self {
            Self::Role => 0,
            Self::Member => 1,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub target: OverwriteTarget,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl PermissionOverwrite {
    /// Hide a channel from everyone in the guild
    ///
    /// The guild's `@everyone` role shares the guild's id.
    pub fn private_channel(guild_id: Snowflake) -> Self {
        Self {
            id: guild_id,
            target: OverwriteTarget::Role,
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
        }
    }

    /// Let one member into a channel
    pub fn member_access(user_id: Snowflake) -> Self {
        Self {
            id: user_id,
            target: OverwriteTarget::Member,
            allow: Permissions::MEMBER_ACCESS,
            deny: Permissions::empty(),
        }
    }
}
