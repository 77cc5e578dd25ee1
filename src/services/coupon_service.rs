use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::coupons::{CouponList, CreateCouponRequest, UpdateCouponRequest},
    entity::{
        Coupons,
        coupons::{ActiveModel, Column},
        sea_orm_active_enums::CouponType,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Coupon,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Percentages are whole numbers 1..=100, fixed amounts are positive minor
/// units, free shipping carries no value.
pub fn validate_coupon(kind: CouponType, value: i64, min_order_amount: i64) -> AppResult<()> {
    match kind {
        CouponType::Percentage if !(1..=100).contains(&value) => Err(AppError::BadRequest(
            "percentage coupons need a value between 1 and 100".into(),
        )),
        CouponType::FixedAmount if value <= 0 => Err(AppError::BadRequest(
            "fixed amount coupons need a positive value".into(),
        )),
        CouponType::FreeShipping if value != 0 => Err(AppError::BadRequest(
            "free shipping coupons carry no value".into(),
        )),
        _ if min_order_amount < 0 => Err(AppError::BadRequest(
            "min_order_amount cannot be negative".into(),
        )),
        _ => Ok(()),
    }
}

pub async fn list_coupons(state: &AppState) -> AppResult<ApiResponse<CouponList>> {
    let items: Vec<Coupon> = Coupons::find()
        .order_by_asc(Column::Code)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Coupon::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Coupons", CouponList { items }, Some(meta)))
}

pub async fn create_coupon(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    let code = payload.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::BadRequest("code is required".into()));
    }
    validate_coupon(payload.kind, payload.value, payload.min_order_amount)?;
    if payload.usage_limit.is_some_and(|l| l <= 0) {
        return Err(AppError::BadRequest("usage_limit must be positive".into()));
    }

    let taken = Coupons::find()
        .filter(Column::Code.eq(code.as_str()))
        .one(state.orm.as_ref())
        .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest(format!("coupon {code} already exists")));
    }

    let coupon = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        kind: Set(payload.kind),
        value: Set(payload.value),
        min_order_amount: Set(payload.min_order_amount),
        usage_limit: Set(payload.usage_limit),
        used_count: Set(0),
        is_active: Set(payload.is_active),
        expires_at: Set(payload.expires_at.map(Into::into)),
        created_at: NotSet,
    }
    .insert(state.orm.as_ref())
    .await?;

    audit::record(
        state,
        admin.user_id,
        "coupon_create",
        "coupons",
        serde_json::json!({ "coupon_id": coupon.id, "code": coupon.code }),
    )
    .await;

    Ok(ApiResponse::ok("Coupon created", coupon.into()))
}

pub async fn update_coupon(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    let existing = Coupons::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    validate_coupon(
        payload.kind.unwrap_or(existing.kind),
        payload.value.unwrap_or(existing.value),
        payload.min_order_amount.unwrap_or(existing.min_order_amount),
    )?;

    let mut active: ActiveModel = existing.into();
    if let Some(kind) = payload.kind {
        active.kind = Set(kind);
    }
    if let Some(value) = payload.value {
        active.value = Set(value);
    }
    if let Some(min) = payload.min_order_amount {
        active.min_order_amount = Set(min);
    }
    if let Some(limit) = payload.usage_limit {
        if limit <= 0 {
            return Err(AppError::BadRequest("usage_limit must be positive".into()));
        }
        active.usage_limit = Set(Some(limit));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(expires_at) = payload.expires_at {
        active.expires_at = Set(Some(expires_at.into()));
    }
    let coupon = active.update(state.orm.as_ref()).await?;

    audit::record(
        state,
        admin.user_id,
        "coupon_update",
        "coupons",
        serde_json::json!({ "coupon_id": coupon.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", coupon.into()))
}

pub async fn delete_coupon(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Coupons::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        admin.user_id,
        "coupon_delete",
        "coupons",
        serde_json::json!({ "coupon_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_must_be_within_bounds() {
        assert!(validate_coupon(CouponType::Percentage, 10, 5000).is_ok());
        assert!(validate_coupon(CouponType::Percentage, 0, 0).is_err());
        assert!(validate_coupon(CouponType::Percentage, 101, 0).is_err());
    }

    #[test]
    fn fixed_and_free_shipping_rules() {
        assert!(validate_coupon(CouponType::FixedAmount, 500, 0).is_ok());
        assert!(validate_coupon(CouponType::FixedAmount, 0, 0).is_err());
        assert!(validate_coupon(CouponType::FreeShipping, 0, 7500).is_ok());
        assert!(validate_coupon(CouponType::FreeShipping, 5, 0).is_err());
        assert!(validate_coupon(CouponType::FreeShipping, 0, -1).is_err());
    }
}
