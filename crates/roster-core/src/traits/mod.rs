//! Ports - interfaces the domain needs from the outside world

mod gateway;
mod repositories;

pub use gateway::{ExternalGateway, GatewayError, GatewayResult};
pub use repositories::{
    AgeRuleRepository, MappingRepository, MemberRepository, NotificationRepository,
    OutboxRepository, RepoResult, TeamRepository,
};
