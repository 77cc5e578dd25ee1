use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        coupons::{CouponList, CreateCouponRequest, UpdateCouponRequest},
        orders::{CartLine, CreateOrderRequest},
        products::{
            CreateProductRequest, CreateReviewRequest, CreateVariantRequest, ProductDetail,
            ProductList, UpdateProductRequest, UpdateVariantRequest,
        },
        settings::{SettingList, UpsertSettingRequest},
        uploads::{ProductImageUpload, StoredFile, UploadResult},
    },
    entity::sea_orm_active_enums::{CouponType, Role, SettingType},
    models::{Category, Coupon, Product, ProductImage, ProductVariant, Review, Setting, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, categories, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        categories::list_categories,
        categories::get_category,
        products::list_products,
        products::get_product,
        products::create_review,
        orders::create_order,
        orders::capture_order,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::create_variant,
        admin::update_variant,
        admin::delete_variant,
        admin::upload_product_images,
        admin::delete_image,
        admin::list_coupons,
        admin::create_coupon,
        admin::update_coupon,
        admin::delete_coupon,
        admin::list_settings,
        admin::upsert_setting,
        admin::upload_media
    ),
    components(
        schemas(
            Role,
            CouponType,
            SettingType,
            User,
            Category,
            Product,
            ProductImage,
            ProductVariant,
            Review,
            Coupon,
            Setting,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            ProductList,
            ProductDetail,
            CreateProductRequest,
            UpdateProductRequest,
            CreateVariantRequest,
            UpdateVariantRequest,
            CreateReviewRequest,
            CouponList,
            CreateCouponRequest,
            UpdateCouponRequest,
            SettingList,
            UpsertSettingRequest,
            StoredFile,
            UploadResult,
            ProductImageUpload,
            CartLine,
            CreateOrderRequest,
            params::Pagination,
            params::ProductQuery,
            params::SortOrder,
            params::ProductSortBy,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetail>,
            ApiResponse<CategoryList>,
            ApiResponse<SettingList>,
            ApiResponse<UploadResult>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Catalog", description = "Public storefront catalog"),
        (name = "Orders", description = "PayPal order creation and capture"),
        (name = "Admin", description = "Admin-only management endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
