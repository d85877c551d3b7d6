//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in roster-core.

mod age_rule;
mod error;
mod mapping;
mod member;
mod notification;
mod outbox;
mod team;

pub use age_rule::PgAgeRuleRepository;
pub use mapping::PgMappingRepository;
pub use member::PgMemberRepository;
pub use notification::PgNotificationRepository;
pub use outbox::{table_name as outbox_table_name, PgOutboxRepository};
pub use team::PgTeamRepository;
