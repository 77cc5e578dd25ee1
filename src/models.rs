use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    categories, coupons, product_images, product_variants, products, reviews,
    sea_orm_active_enums::{CouponType, Role, SettingType},
    settings, users,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: Option<String>,
    pub old_price: Option<i64>,
    pub new_price: i64,
    pub stock: i32,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
    pub is_primary: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub value: String,
    pub sku: String,
    pub stock: i32,
    pub price_delta: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub kind: CouponType,
    pub value: i64,
    pub min_order_amount: i64,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub kind: SettingType,
    pub updated_at: DateTime<Utc>,
}

/// A setting's text read according to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Number(f64),
}

impl SettingValue {
    pub fn parse(kind: SettingType, raw: &str) -> Option<Self> {
        match kind {
            SettingType::Text => Some(SettingValue::Text(raw.to_string())),
            SettingType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(SettingValue::Number),
        }
    }
}

impl Setting {
    pub fn typed_value(&self) -> Option<SettingValue> {
        SettingValue::parse(self.kind, &self.value)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
            sku: model.sku,
            description: model.description,
            old_price: model.old_price,
            new_price: model.new_price,
            stock: model.stock,
            is_featured: model.is_featured,
            is_on_sale: model.is_on_sale,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<product_images::Model> for ProductImage {
    fn from(model: product_images::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            url: model.url,
            alt_text: model.alt_text,
            sort_order: model.sort_order,
            is_primary: model.is_primary,
        }
    }
}

impl From<product_variants::Model> for ProductVariant {
    fn from(model: product_variants::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            name: model.name,
            value: model.value,
            sku: model.sku,
            stock: model.stock,
            price_delta: model.price_delta,
        }
    }
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            rating: model.rating,
            title: model.title,
            comment: model.comment,
            is_verified: model.is_verified,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<coupons::Model> for Coupon {
    fn from(model: coupons::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            kind: model.kind,
            value: model.value,
            min_order_amount: model.min_order_amount,
            usage_limit: model.usage_limit,
            used_count: model.used_count,
            is_active: model.is_active,
            expires_at: model.expires_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<settings::Model> for Setting {
    fn from(model: settings::Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
            kind: model.kind,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_setting_parses_numeric_text() {
        assert_eq!(
            SettingValue::parse(SettingType::Number, " 50.5 "),
            Some(SettingValue::Number(50.5))
        );
    }

    #[test]
    fn number_setting_rejects_garbage() {
        assert_eq!(SettingValue::parse(SettingType::Number, "fifty"), None);
        assert_eq!(SettingValue::parse(SettingType::Number, "NaN"), None);
    }

    #[test]
    fn text_setting_is_kept_verbatim() {
        assert_eq!(
            SettingValue::parse(SettingType::Text, "Rusty Store"),
            Some(SettingValue::Text("Rusty Store".into()))
        );
    }
}
