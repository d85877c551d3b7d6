//! Test fixtures and data generators

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use roster_core::{AgeThresholdRule, ChannelSyncKind, MemberSnapshot, RoleSyncKind, Snowflake};
use roster_sync::{
    ChannelSyncHandler, MappingResolver, ProcessorConfig, RetryPolicy, RoleSyncHandler,
    SyncContext, SyncProcessor,
};

use crate::fakes::{
    InMemoryAgeRules, InMemoryMappings, InMemoryMembers, InMemoryNotifications, InMemoryOutbox,
    InMemoryTeams, RecordingGateway,
};

/// Counter for unique snowflakes
static COUNTER: AtomicI64 = AtomicI64::new(100_000);

/// Get a unique snowflake for test data
pub fn snowflake() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Age rule for `team_id` bound to a fresh role
pub fn age_rule(team_id: Uuid, name: &str, min_age: Option<i32>, max_age: Option<i32>) -> AgeThresholdRule {
    AgeThresholdRule {
        id: Uuid::new_v4(),
        team_id,
        role_id: Uuid::new_v4(),
        role_name: name.to_string(),
        min_age,
        max_age,
    }
}

/// Member with a birth year and a linked chat account
pub fn member(name: &str, birth_year: Option<i32>) -> MemberSnapshot {
    let mut member = MemberSnapshot::new(Uuid::new_v4(), name);
    member.user_id = Some(Uuid::new_v4());
    member.birth_year = birth_year;
    member.external_user_id = Some(snowflake());
    member
}

/// Admin member without a birth year
pub fn admin(name: &str) -> MemberSnapshot {
    let mut admin = member(name, None);
    admin.is_admin = true;
    admin
}

/// Every port backed by an in-memory fake
pub struct TestHarness {
    pub team_id: Uuid,
    pub guild_id: Snowflake,
    pub role_outbox: Arc<InMemoryOutbox<RoleSyncKind>>,
    pub channel_outbox: Arc<InMemoryOutbox<ChannelSyncKind>>,
    pub role_mappings: Arc<InMemoryMappings>,
    pub channel_mappings: Arc<InMemoryMappings>,
    pub teams: Arc<InMemoryTeams>,
    pub rules: Arc<InMemoryAgeRules>,
    pub members: Arc<InMemoryMembers>,
    pub notifications: Arc<InMemoryNotifications>,
    pub gateway: Arc<RecordingGateway>,
    pub context: SyncContext,
}

impl TestHarness {
    /// One team linked to a guild, retries without delay
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::immediate())
    }

    pub fn with_retry(retry: RetryPolicy) -> Self {
        let team_id = Uuid::new_v4();
        let guild_id = snowflake();

        let role_outbox = Arc::new(InMemoryOutbox::<RoleSyncKind>::new());
        let channel_outbox = Arc::new(InMemoryOutbox::<ChannelSyncKind>::new());
        let role_mappings = Arc::new(InMemoryMappings::new());
        let channel_mappings = Arc::new(InMemoryMappings::new());
        let teams = Arc::new(InMemoryTeams::new());
        let rules = Arc::new(InMemoryAgeRules::new());
        let members = Arc::new(InMemoryMembers::new());
        let notifications = Arc::new(InMemoryNotifications::new());
        let gateway = Arc::new(RecordingGateway::new());

        teams.insert(team_id, Some(guild_id));

        let context = SyncContext::builder()
            .role_outbox(role_outbox.clone())
            .channel_outbox(channel_outbox.clone())
            .role_mappings(role_mappings.clone())
            .channel_mappings(channel_mappings.clone())
            .team_repo(teams.clone())
            .age_rule_repo(rules.clone())
            .member_repo(members.clone())
            .notification_repo(notifications.clone())
            .gateway(gateway.clone())
            .retry_policy(retry)
            .build()
            .expect("all ports provided");

        Self {
            team_id,
            guild_id,
            role_outbox,
            channel_outbox,
            role_mappings,
            channel_mappings,
            teams,
            rules,
            members,
            notifications,
            gateway,
            context,
        }
    }

    pub fn role_processor(&self) -> SyncProcessor<RoleSyncHandler> {
        self.context.role_processor(ProcessorConfig::default())
    }

    pub fn channel_processor(&self) -> SyncProcessor<ChannelSyncHandler> {
        self.context.channel_processor(ProcessorConfig::default())
    }

    pub fn role_resolver(&self) -> MappingResolver {
        self.context.role_resolver()
    }

    /// Map a role as if it had been created earlier
    pub fn map_role(&self, role_id: Uuid) -> Snowflake {
        let external_id = snowflake();
        self.role_mappings.insert_now(self.team_id, role_id, external_id);
        external_id
    }

    /// Map a subgroup as if its channel had been created earlier
    pub fn map_channel(&self, subgroup_id: Uuid) -> Snowflake {
        let external_id = snowflake();
        self.channel_mappings.insert_now(self.team_id, subgroup_id, external_id);
        external_id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::ExternalResource;

    #[test]
    fn test_resource_kinds_match_streams() {
        let harness = TestHarness::new();
        assert_eq!(harness.role_resolver().resource(), ExternalResource::Role);
        assert_eq!(harness.context.channel_resolver().resource(), ExternalResource::Channel);
    }
}
