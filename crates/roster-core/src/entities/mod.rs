//! Domain entities - core business objects

mod age_rule;
mod change;
mod mapping;
mod member;
mod notification;
mod overwrite;
mod sync_event;

pub use age_rule::{age_in, AgeThresholdRule};
pub use change::{ChangeAction, RoleChange};
pub use mapping::{ExternalResource, Mapping};
pub use member::MemberSnapshot;
pub use notification::{NewNotification, AGE_ROLE_CHANGE};
pub use overwrite::{OverwriteTarget, PermissionOverwrite};
pub use sync_event::{NewSyncEvent, SyncEvent};
