use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::sea_orm_active_enums::SettingType, models::Setting};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    pub value: String,
    /// Defaults to the stored type, or `string` for a new key.
    pub kind: Option<SettingType>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SettingList {
    #[schema(value_type = Vec<Setting>)]
    pub items: Vec<Setting>,
}
