use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Product, ProductImage, ProductVariant, Review};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: uuid::Uuid,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: Option<String>,
    pub old_price: Option<i64>,
    pub new_price: i64,
    pub cost_price: Option<i64>,
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_on_sale: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub category_id: Option<uuid::Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub old_price: Option<i64>,
    pub new_price: Option<i64>,
    pub cost_price: Option<i64>,
    pub stock: Option<i32>,
    pub is_featured: Option<bool>,
    pub is_on_sale: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVariantRequest {
    pub name: String,
    pub value: String,
    pub sku: String,
    pub stock: i32,
    #[serde(default)]
    pub price_delta: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVariantRequest {
    pub stock: Option<i32>,
    pub price_delta: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub rating: i16,
    pub title: Option<String>,
    pub comment: Option<String>,
}
