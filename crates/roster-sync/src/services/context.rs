//! Sync context - dependency container for the engine
//!
//! Holds every port the processors, recorder and reconciliation need.

use std::sync::Arc;

use roster_core::traits::{
    AgeRuleRepository, ExternalGateway, MappingRepository, MemberRepository,
    NotificationRepository, OutboxRepository, TeamRepository,
};
use roster_core::{ChannelSyncKind, ExternalResource, RoleSyncKind};

use super::error::{ServiceError, ServiceResult};
use super::handlers::{ChannelSyncHandler, RoleSyncHandler};
use super::processor::{ProcessorConfig, SyncProcessor};
use super::reconciliation::AgeReconciliationService;
use super::recorder::OutboxRecorder;
use super::resolver::MappingResolver;
use super::retry::RetryPolicy;

/// Engine dependencies
#[derive(Clone)]
pub struct SyncContext {
    // Outbox streams
    role_outbox: Arc<dyn OutboxRepository<RoleSyncKind>>,
    channel_outbox: Arc<dyn OutboxRepository<ChannelSyncKind>>,

    // Mapping stores
    role_mappings: Arc<dyn MappingRepository>,
    channel_mappings: Arc<dyn MappingRepository>,

    // Product tables
    team_repo: Arc<dyn TeamRepository>,
    age_rule_repo: Arc<dyn AgeRuleRepository>,
    member_repo: Arc<dyn MemberRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // Chat platform
    gateway: Arc<dyn ExternalGateway>,
    retry_policy: RetryPolicy,
}

impl SyncContext {
    /// Start building a context
    pub fn builder() -> SyncContextBuilder {
        SyncContextBuilder::new()
    }

    // === Outbox ===

    pub fn role_outbox(&self) -> &dyn OutboxRepository<RoleSyncKind> {
        self.role_outbox.as_ref()
    }

    pub fn channel_outbox(&self) -> &dyn OutboxRepository<ChannelSyncKind> {
        self.channel_outbox.as_ref()
    }

    // === Repositories ===

    pub fn team_repo(&self) -> &dyn TeamRepository {
        self.team_repo.as_ref()
    }

    pub fn age_rule_repo(&self) -> &dyn AgeRuleRepository {
        self.age_rule_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    // === Engine components ===

    /// Resolver for team roles
    pub fn role_resolver(&self) -> MappingResolver {
        MappingResolver::new(
            Arc::clone(&self.role_mappings),
            Arc::clone(&self.gateway),
            ExternalResource::Role,
            self.retry_policy,
        )
    }

    /// Resolver for subgroup channels
    pub fn channel_resolver(&self) -> MappingResolver {
        MappingResolver::new(
            Arc::clone(&self.channel_mappings),
            Arc::clone(&self.gateway),
            ExternalResource::Channel,
            self.retry_policy,
        )
    }

    /// Processor for the role stream
    pub fn role_processor(&self, config: ProcessorConfig) -> SyncProcessor<RoleSyncHandler> {
        let handler = RoleSyncHandler::new(
            self.role_resolver(),
            Arc::clone(&self.gateway),
            self.retry_policy,
        );
        SyncProcessor::new(Arc::clone(&self.role_outbox), handler, config)
    }

    /// Processor for the channel stream
    pub fn channel_processor(&self, config: ProcessorConfig) -> SyncProcessor<ChannelSyncHandler> {
        let handler = ChannelSyncHandler::new(
            self.channel_resolver(),
            Arc::clone(&self.gateway),
            self.retry_policy,
        );
        SyncProcessor::new(Arc::clone(&self.channel_outbox), handler, config)
    }

    /// Producer side, for mutation handlers
    pub fn recorder(&self) -> OutboxRecorder<'_> {
        OutboxRecorder::new(self)
    }

    /// Age-based role reconciliation
    pub fn reconciliation(&self) -> AgeReconciliationService<'_> {
        AgeReconciliationService::new(self)
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("repositories", &"...")
            .field("gateway", &"dyn ExternalGateway")
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Builder for creating SyncContext
#[derive(Default)]
pub struct SyncContextBuilder {
    role_outbox: Option<Arc<dyn OutboxRepository<RoleSyncKind>>>,
    channel_outbox: Option<Arc<dyn OutboxRepository<ChannelSyncKind>>>,
    role_mappings: Option<Arc<dyn MappingRepository>>,
    channel_mappings: Option<Arc<dyn MappingRepository>>,
    team_repo: Option<Arc<dyn TeamRepository>>,
    age_rule_repo: Option<Arc<dyn AgeRuleRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    gateway: Option<Arc<dyn ExternalGateway>>,
    retry_policy: Option<RetryPolicy>,
}

impl SyncContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role_outbox(mut self, repo: Arc<dyn OutboxRepository<RoleSyncKind>>) -> Self {
        self.role_outbox = Some(repo);
        self
    }

    pub fn channel_outbox(mut self, repo: Arc<dyn OutboxRepository<ChannelSyncKind>>) -> Self {
        self.channel_outbox = Some(repo);
        self
    }

    pub fn role_mappings(mut self, repo: Arc<dyn MappingRepository>) -> Self {
        self.role_mappings = Some(repo);
        self
    }

    pub fn channel_mappings(mut self, repo: Arc<dyn MappingRepository>) -> Self {
        self.channel_mappings = Some(repo);
        self
    }

    pub fn team_repo(mut self, repo: Arc<dyn TeamRepository>) -> Self {
        self.team_repo = Some(repo);
        self
    }

    pub fn age_rule_repo(mut self, repo: Arc<dyn AgeRuleRepository>) -> Self {
        self.age_rule_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn ExternalGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Defaults to [`RetryPolicy::default`]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Build the SyncContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<SyncContext> {
        Ok(SyncContext {
            role_outbox: self.role_outbox.ok_or_else(|| missing("role_outbox"))?,
            channel_outbox: self.channel_outbox.ok_or_else(|| missing("channel_outbox"))?,
            role_mappings: self.role_mappings.ok_or_else(|| missing("role_mappings"))?,
            channel_mappings: self.channel_mappings.ok_or_else(|| missing("channel_mappings"))?,
            team_repo: self.team_repo.ok_or_else(|| missing("team_repo"))?,
            age_rule_repo: self.age_rule_repo.ok_or_else(|| missing("age_rule_repo"))?,
            member_repo: self.member_repo.ok_or_else(|| missing("member_repo"))?,
            notification_repo: self.notification_repo.ok_or_else(|| missing("notification_repo"))?,
            gateway: self.gateway.ok_or_else(|| missing("gateway"))?,
            retry_policy: self.retry_policy.unwrap_or_default(),
        })
    }
}

fn missing(field: &str) -> ServiceError {
    ServiceError::validation(format!("{field} is required"))
}
