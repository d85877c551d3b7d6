//! Age rule entity <-> model mapper

use roster_core::entities::AgeThresholdRule;

use crate::models::AgeRuleModel;

impl From<AgeRuleModel> for AgeThresholdRule {
    fn from(model: AgeRuleModel) -> Self {
        AgeThresholdRule {
            id: model.id,
            team_id: model.team_id,
            role_id: model.role_id,
            role_name: model.role_name,
            min_age: model.min_age,
            max_age: model.max_age,
        }
    }
}
