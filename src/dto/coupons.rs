use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::sea_orm_active_enums::CouponType, models::Coupon};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub kind: CouponType,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub min_order_amount: i64,
    pub usage_limit: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub kind: Option<CouponType>,
    pub value: Option<i64>,
    pub min_order_amount: Option<i64>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CouponList {
    #[schema(value_type = Vec<Coupon>)]
    pub items: Vec<Coupon>,
}

fn default_active() -> bool {
    true
}
