//! Member snapshot <-> model mapper

use roster_core::entities::MemberSnapshot;
use roster_core::value_objects::Snowflake;

use crate::models::MemberSnapshotModel;

impl From<MemberSnapshotModel> for MemberSnapshot {
    fn from(model: MemberSnapshotModel) -> Self {
        MemberSnapshot {
            member_id: model.id,
            user_id: model.user_id,
            display_name: model.display_name,
            birth_year: model.birth_year,
            role_ids: model.role_ids,
            is_admin: model.is_admin,
            external_user_id: model.discord_user_id.map(Snowflake::new),
        }
    }
}
