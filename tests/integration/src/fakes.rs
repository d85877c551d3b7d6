//! In-memory port implementations
//!
//! Each fake keeps its state behind a `parking_lot::Mutex` and exposes
//! inspection helpers so tests can assert on what the engine did.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use roster_core::{
    AgeThresholdRule, AgeRuleRepository, DomainError, ExternalGateway, GatewayError,
    GatewayResult, Mapping, MappingRepository, MemberRepository, MemberSnapshot, NewNotification,
    NewSyncEvent, NotificationRepository, OutboxRepository, PermissionOverwrite, Permissions,
    RepoResult, Snowflake, SyncEvent, SyncEventKind, TeamRepository,
};

fn unavailable() -> DomainError {
    DomainError::DatabaseError("connection refused".to_string())
}

// ============================================================================
// Outbox
// ============================================================================

/// Outbox stream held in a vector
pub struct InMemoryOutbox<K> {
    events: Mutex<Vec<SyncEvent<K>>>,
    claims: Mutex<HashMap<i64, (String, Instant)>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl<K: SyncEventKind> Default for InMemoryOutbox<K> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            claims: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }
}

impl<K: SyncEventKind> InMemoryOutbox<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time
    pub fn insert_at(&self, event: &NewSyncEvent<K>, created_at: DateTime<Utc>) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.events.lock().push(SyncEvent {
            id,
            team_id: event.team_id,
            external_guild_id: event.external_guild_id,
            kind: event.kind,
            subject_id: event.subject_id,
            subject_name: event.subject_name.clone(),
            member_id: event.member_id,
            external_user_id: event.external_user_id,
            created_at,
            processed_at: None,
            error: None,
        });
        id
    }

    /// Make every call fail like a lost database connection
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn get(&self, id: i64) -> Option<SyncEvent<K>> {
        self.events.lock().iter().find(|e| e.id == id).cloned()
    }

    pub fn all(&self) -> Vec<SyncEvent<K>> {
        self.events.lock().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.events.lock().iter().filter(|e| e.is_pending()).count()
    }

    fn check(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn pending_sorted(&self) -> Vec<SyncEvent<K>> {
        let mut pending: Vec<_> = self
            .events
            .lock()
            .iter()
            .filter(|e| e.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        pending
    }

    fn finish(&self, id: i64, error: Option<&str>) {
        let mut events = self.events.lock();
        if let Some(event) = events.iter_mut().find(|e| e.id == id && e.is_pending()) {
            event.processed_at = Some(Utc::now());
            event.error = error.map(str::to_string);
        }
    }
}

#[async_trait]
impl<K: SyncEventKind> OutboxRepository<K> for InMemoryOutbox<K> {
    async fn append(&self, event: &NewSyncEvent<K>) -> RepoResult<i64> {
        self.check()?;
        Ok(self.insert_at(event, Utc::now()))
    }

    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<SyncEvent<K>>> {
        self.check()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.pending_sorted().into_iter().take(limit).collect())
    }

    async fn claim_pending(
        &self,
        limit: i64,
        claimant: &str,
        lease: Duration,
    ) -> RepoResult<Vec<SyncEvent<K>>> {
        self.check()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        let now = Instant::now();
        let mut claims = self.claims.lock();

        let claimed: Vec<_> = self
            .pending_sorted()
            .into_iter()
            .filter(|e| {
                claims
                    .get(&e.id)
                    .is_none_or(|(_, at)| now.duration_since(*at) >= lease)
            })
            .take(limit)
            .collect();

        for event in &claimed {
            claims.insert(event.id, (claimant.to_string(), now));
        }
        Ok(claimed)
    }

    async fn mark_processed(&self, id: i64) -> RepoResult<()> {
        self.check()?;
        self.finish(id, None);
        Ok(())
    }

    async fn mark_failed(&self, id: i64, error: &str) -> RepoResult<()> {
        self.check()?;
        self.finish(id, Some(error));
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<SyncEvent<K>>> {
        self.check()?;
        Ok(self.get(id))
    }
}

// ============================================================================
// Mappings
// ============================================================================

#[derive(Default)]
pub struct InMemoryMappings {
    rows: Mutex<HashMap<(Uuid, Uuid), Mapping>>,
    next_id: AtomicI64,
}

impl InMemoryMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a mapping without going through the trait
    pub fn insert_now(&self, team_id: Uuid, internal_id: Uuid, external_id: Snowflake) {
        let now = Utc::now();
        self.rows.lock().insert(
            (team_id, internal_id),
            Mapping {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                team_id,
                internal_id,
                external_id,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn external_id(&self, team_id: Uuid, internal_id: Uuid) -> Option<Snowflake> {
        self.rows.lock().get(&(team_id, internal_id)).map(|m| m.external_id)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappings {
    async fn find(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<Option<Mapping>> {
        Ok(self.rows.lock().get(&(team_id, internal_id)).cloned())
    }

    async fn upsert(&self, team_id: Uuid, internal_id: Uuid, external_id: Snowflake) -> RepoResult<()> {
        let now = Utc::now();
        let mut rows = self.rows.lock();
        rows.entry((team_id, internal_id))
            .and_modify(|m| {
                m.external_id = external_id;
                m.updated_at = now;
            })
            .or_insert_with(|| Mapping {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                team_id,
                internal_id,
                external_id,
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn delete(&self, team_id: Uuid, internal_id: Uuid) -> RepoResult<()> {
        self.rows.lock().remove(&(team_id, internal_id));
        Ok(())
    }
}

// ============================================================================
// Teams, rules, members, notifications
// ============================================================================

/// Teams and their linked guild; unknown teams are `TeamNotFound`
#[derive(Default)]
pub struct InMemoryTeams {
    guilds: Mutex<HashMap<Uuid, Option<Snowflake>>>,
    lookups: AtomicI64,
}

impl InMemoryTeams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, team_id: Uuid, guild_id: Option<Snowflake>) {
        self.guilds.lock().insert(team_id, guild_id);
    }

    pub fn lookups(&self) -> i64 {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeams {
    async fn find_external_guild(&self, team_id: Uuid) -> RepoResult<Option<Snowflake>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.guilds
            .lock()
            .get(&team_id)
            .copied()
            .ok_or(DomainError::TeamNotFound(team_id))
    }
}

#[derive(Default)]
pub struct InMemoryAgeRules {
    rules: Mutex<Vec<AgeThresholdRule>>,
}

impl InMemoryAgeRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, rule: AgeThresholdRule) {
        self.rules.lock().push(rule);
    }
}

#[async_trait]
impl AgeRuleRepository for InMemoryAgeRules {
    async fn find_by_team(&self, team_id: Uuid) -> RepoResult<Vec<AgeThresholdRule>> {
        Ok(self
            .rules
            .lock()
            .iter()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect())
    }
}

/// Member roster keyed by team, with role writes applied to the snapshot
#[derive(Default)]
pub struct InMemoryMembers {
    members: Mutex<Vec<(Uuid, MemberSnapshot)>>,
    failing: Mutex<HashSet<(Uuid, Uuid)>>,
    unavailable: AtomicBool,
}

impl InMemoryMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, team_id: Uuid, member: MemberSnapshot) {
        self.members.lock().push((team_id, member));
    }

    /// Make role writes for this pair fail
    pub fn fail_role_write(&self, member_id: Uuid, role_id: Uuid) {
        self.failing.lock().insert((member_id, role_id));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn roles_of(&self, member_id: Uuid) -> Vec<Uuid> {
        self.members
            .lock()
            .iter()
            .find(|(_, m)| m.member_id == member_id)
            .map(|(_, m)| m.role_ids.clone())
            .unwrap_or_default()
    }

    fn write(&self, member_id: Uuid, role_id: Uuid, assign: bool) -> RepoResult<()> {
        if self.failing.lock().contains(&(member_id, role_id)) {
            return Err(unavailable());
        }

        let mut members = self.members.lock();
        let (_, member) = members
            .iter_mut()
            .find(|(_, m)| m.member_id == member_id)
            .ok_or_else(|| DomainError::DatabaseError(format!("no member {member_id}")))?;

        if assign {
            if !member.has_role(role_id) {
                member.role_ids.push(role_id);
            }
        } else {
            member.role_ids.retain(|id| *id != role_id);
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryMembers {
    async fn snapshot(&self, team_id: Uuid) -> RepoResult<Vec<MemberSnapshot>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .members
            .lock()
            .iter()
            .filter(|(team, _)| *team == team_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn assign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()> {
        self.write(member_id, role_id, true)
    }

    async fn unassign_role(&self, member_id: Uuid, role_id: Uuid) -> RepoResult<()> {
        self.write(member_id, role_id, false)
    }
}

/// Records every batch handed to `insert_many`
#[derive(Default)]
pub struct InMemoryNotifications {
    batches: Mutex<Vec<Vec<NewNotification>>>,
}

impl InMemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<NewNotification>> {
        self.batches.lock().clone()
    }

    pub fn all(&self) -> Vec<NewNotification> {
        self.batches.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotifications {
    async fn insert_many(&self, notifications: &[NewNotification]) -> RepoResult<u64> {
        if notifications.is_empty() {
            return Ok(0);
        }
        self.batches.lock().push(notifications.to_vec());
        Ok(notifications.len() as u64)
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// One call made against the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateRole { guild_id: Snowflake, name: String },
    DeleteRole { guild_id: Snowflake, role_id: Snowflake },
    GrantRole { guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake },
    RevokeRole { guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake },
    CreateChannel { guild_id: Snowflake, name: String, overwrites: Vec<PermissionOverwrite> },
    DeleteChannel { channel_id: Snowflake },
    GrantChannelAccess { channel_id: Snowflake, user_id: Snowflake, allow: Permissions },
    RevokeChannelAccess { channel_id: Snowflake, user_id: Snowflake },
}

impl GatewayCall {
    /// Operation name, matching the retry labels
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreateRole { .. } => "create_role",
            Self::DeleteRole { .. } => "delete_role",
            Self::GrantRole { .. } => "grant_role",
            Self::RevokeRole { .. } => "revoke_role",
            Self::CreateChannel { .. } => "create_channel",
            Self::DeleteChannel { .. } => "delete_channel",
            Self::GrantChannelAccess { .. } => "grant_channel_access",
            Self::RevokeChannelAccess { .. } => "revoke_channel_access",
        }
    }
}

/// Gateway that records calls and replays scripted failures
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    failures: Mutex<HashMap<&'static str, VecDeque<GatewayError>>>,
    next_id: AtomicI64,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(900_000_000_000_000_000),
        }
    }
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error for the next call of `operation`
    pub fn fail_next(&self, operation: &'static str, error: GatewayError) {
        self.failures.lock().entry(operation).or_default().push_back(error);
    }

    /// Queue the same error for the next `times` calls of `operation`
    pub fn fail_times(&self, operation: &'static str, error: &GatewayError, times: usize) {
        for _ in 0..times {
            self.fail_next(operation, error.clone());
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(GatewayCall::operation).collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.operation() == operation).count()
    }

    fn record(&self, call: GatewayCall) -> GatewayResult<()> {
        let operation = call.operation();
        self.calls.lock().push(call);
        match self.failures.lock().get_mut(operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn new_id(&self) -> Snowflake {
        Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl ExternalGateway for RecordingGateway {
    async fn create_role(&self, guild_id: Snowflake, name: &str) -> GatewayResult<Snowflake> {
        self.record(GatewayCall::CreateRole {
            guild_id,
            name: name.to_string(),
        })?;
        Ok(self.new_id())
    }

    async fn delete_role(&self, guild_id: Snowflake, role_id: Snowflake) -> GatewayResult<()> {
        self.record(GatewayCall::DeleteRole { guild_id, role_id })
    }

    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::GrantRole {
            guild_id,
            user_id,
            role_id,
        })
    }

    async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::RevokeRole {
            guild_id,
            user_id,
            role_id,
        })
    }

    async fn create_channel(
        &self,
        guild_id: Snowflake,
        name: &str,
        overwrites: &[PermissionOverwrite],
    ) -> GatewayResult<Snowflake> {
        self.record(GatewayCall::CreateChannel {
            guild_id,
            name: name.to_string(),
            overwrites: overwrites.to_vec(),
        })?;
        Ok(self.new_id())
    }

    async fn delete_channel(&self, channel_id: Snowflake) -> GatewayResult<()> {
        self.record(GatewayCall::DeleteChannel { channel_id })
    }

    async fn grant_channel_access(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        allow: Permissions,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::GrantChannelAccess {
            channel_id,
            user_id,
            allow,
        })
    }

    async fn revoke_channel_access(&self, channel_id: Snowflake, user_id: Snowflake) -> GatewayResult<()> {
        self.record(GatewayCall::RevokeChannelAccess { channel_id, user_id })
    }
}
