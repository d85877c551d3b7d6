//! Mapping entity <-> model mapper

use roster_core::entities::Mapping;
use roster_core::value_objects::Snowflake;

use crate::models::MappingModel;

impl From<MappingModel> for Mapping {
    fn from(model: MappingModel) -> Self {
        Mapping {
            id: model.id,
            team_id: model.team_id,
            internal_id: model.internal_id,
            external_id: Snowflake::new(model.external_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
