//! Entity to model mappers
//!
//! - `From<Model> for Entity` / `TryFrom`: database rows to domain objects
//! - `*Insert` / `*Columns` structs: entity data prepared for binding

mod age_rule;
mod mapping;
mod member;
mod notification;
mod sync_event;

pub use notification::NotificationColumns;
pub use sync_event::{sync_events, SyncEventInsert};
