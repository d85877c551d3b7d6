//! Database models - SQLx-compatible structs for PostgreSQL tables

mod age_rule;
mod mapping;
mod member;
mod sync_event;

pub use age_rule::AgeRuleModel;
pub use mapping::MappingModel;
pub use member::MemberSnapshotModel;
pub use sync_event::SyncEventModel;
