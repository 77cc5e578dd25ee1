use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::settings::{SettingList, UpsertSettingRequest},
    entity::{
        Settings,
        sea_orm_active_enums::SettingType,
        settings::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{Setting, SettingValue},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_settings(state: &AppState) -> AppResult<ApiResponse<SettingList>> {
    let items: Vec<Setting> = Settings::find()
        .order_by_asc(Column::Key)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Setting::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Settings", SettingList { items }, Some(meta)))
}

/// Create the key or replace its value. The declared type is kept unless the
/// request names a new one, and the value must be readable as that type.
pub async fn upsert_setting(
    state: &AppState,
    admin: &AdminUser,
    key: String,
    payload: UpsertSettingRequest,
) -> AppResult<ApiResponse<Setting>> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(AppError::BadRequest("key is required".into()));
    }

    let existing = Settings::find()
        .filter(Column::Key.eq(key.as_str()))
        .one(state.orm.as_ref())
        .await?;

    let kind = payload
        .kind
        .or(existing.as_ref().map(|s| s.kind))
        .unwrap_or(SettingType::Text);
    if SettingValue::parse(kind, &payload.value).is_none() {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid number for setting {key}",
            payload.value
        )));
    }

    let setting = match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.value = Set(payload.value);
            active.kind = Set(kind);
            active.updated_at = Set(Utc::now().into());
            active.update(state.orm.as_ref()).await?
        }
        None => {
            ActiveModel {
                id: Set(Uuid::new_v4()),
                key: Set(key),
                value: Set(payload.value),
                kind: Set(kind),
                updated_at: Set(Utc::now().into()),
            }
            .insert(state.orm.as_ref())
            .await?
        }
    };

    audit::record(
        state,
        admin.user_id,
        "setting_upsert",
        "settings",
        serde_json::json!({ "key": setting.key, "value": setting.value }),
    )
    .await;

    Ok(ApiResponse::ok("Setting saved", setting.into()))
}
