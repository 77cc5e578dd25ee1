//! Fixture bootstrap for a fresh or partially seeded database.
//!
//! Every row is inserted with `ON CONFLICT (<natural key>) DO NOTHING`, so
//! running the seed again creates nothing new and never overwrites existing
//! rows. Statements run one at a time in foreign-key order.

use rand::Rng;
use sea_orm::DatabaseConnection;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{entity::sea_orm_active_enums::Role, services::auth_service::hash_password};

pub const SIZES: [&str; 4] = ["S", "M", "L", "XL"];
pub const COLORS: [&str; 3] = ["Black", "White", "Navy"];
pub const VARIANT_NAME: &str = "Size/Color";

pub struct UserFixture {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

pub const USERS: [UserFixture; 2] = [
    UserFixture {
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
        first_name: "Store",
        last_name: "Admin",
    },
    UserFixture {
        email: "customer@example.com",
        password: "customer123",
        role: Role::Customer,
        first_name: "Casey",
        last_name: "Customer",
    },
];

pub struct CategoryFixture {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: [CategoryFixture; 3] = [
    CategoryFixture {
        slug: "t-shirts",
        name: "T-Shirts",
        description: "Everyday cotton tees",
    },
    CategoryFixture {
        slug: "hoodies",
        name: "Hoodies",
        description: "Warm layers for cold evenings",
    },
    CategoryFixture {
        slug: "jackets",
        name: "Jackets",
        description: "Outerwear for every season",
    },
];

pub struct ProductFixture {
    pub sku: &'static str,
    pub slug: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub old_price: Option<i64>,
    pub new_price: i64,
    pub cost_price: i64,
    pub stock: i32,
    pub is_featured: bool,
    pub is_on_sale: bool,
    pub images: &'static [&'static str],
}

pub const PRODUCTS: [ProductFixture; 5] = [
    ProductFixture {
        sku: "TSH-CLASSIC",
        slug: "classic-crew-tee",
        name: "Classic Crew Tee",
        category: "t-shirts",
        description: "Heavyweight cotton tee with a relaxed fit",
        old_price: Some(2999),
        new_price: 1999,
        cost_price: 800,
        stock: 120,
        is_featured: true,
        is_on_sale: true,
        images: &[
            "/uploads/seed/classic-crew-tee-front.jpg",
            "/uploads/seed/classic-crew-tee-back.jpg",
        ],
    },
    ProductFixture {
        sku: "TSH-POCKET",
        slug: "pocket-tee",
        name: "Pocket Tee",
        category: "t-shirts",
        description: "Garment-dyed tee with a chest pocket",
        old_price: None,
        new_price: 2499,
        cost_price: 950,
        stock: 80,
        is_featured: false,
        is_on_sale: false,
        images: &["/uploads/seed/pocket-tee.jpg"],
    },
    ProductFixture {
        sku: "HOD-ZIP",
        slug: "zip-hoodie",
        name: "Zip Hoodie",
        category: "hoodies",
        description: "Brushed fleece full-zip hoodie",
        old_price: Some(6999),
        new_price: 5499,
        cost_price: 2100,
        stock: 60,
        is_featured: true,
        is_on_sale: true,
        images: &[
            "/uploads/seed/zip-hoodie-front.jpg",
            "/uploads/seed/zip-hoodie-detail.jpg",
        ],
    },
    ProductFixture {
        sku: "HOD-PULL",
        slug: "pullover-hoodie",
        name: "Pullover Hoodie",
        category: "hoodies",
        description: "Midweight pullover with kangaroo pocket",
        old_price: None,
        new_price: 4999,
        cost_price: 1900,
        stock: 45,
        is_featured: false,
        is_on_sale: false,
        images: &["/uploads/seed/pullover-hoodie.jpg"],
    },
    ProductFixture {
        sku: "JKT-COACH",
        slug: "coach-jacket",
        name: "Coach Jacket",
        category: "jackets",
        description: "Water-resistant nylon coach jacket",
        old_price: None,
        new_price: 8999,
        cost_price: 3600,
        stock: 25,
        is_featured: true,
        is_on_sale: false,
        images: &["/uploads/seed/coach-jacket.jpg"],
    },
];

pub struct ReviewFixture {
    pub user: &'static str,
    pub product: &'static str,
    pub rating: i16,
    pub title: &'static str,
    pub comment: &'static str,
}

pub const REVIEWS: [ReviewFixture; 3] = [
    ReviewFixture {
        user: "customer@example.com",
        product: "TSH-CLASSIC",
        rating: 5,
        title: "My new favourite tee",
        comment: "Thick fabric and it kept its shape after washing.",
    },
    ReviewFixture {
        user: "customer@example.com",
        product: "HOD-ZIP",
        rating: 4,
        title: "Warm and comfy",
        comment: "Runs slightly large, size down if in doubt.",
    },
    ReviewFixture {
        user: "admin@example.com",
        product: "TSH-CLASSIC",
        rating: 4,
        title: "Solid basic",
        comment: "Good value at the sale price.",
    },
];

pub struct CouponFixture {
    pub code: &'static str,
    pub kind: &'static str,
    pub value: i64,
    pub min_order_amount: i64,
    pub usage_limit: Option<i32>,
}

pub const COUPONS: [CouponFixture; 3] = [
    CouponFixture {
        code: "WELCOME10",
        kind: "PERCENTAGE",
        value: 10,
        min_order_amount: 5000,
        usage_limit: Some(100),
    },
    CouponFixture {
        code: "SAVE20",
        kind: "FIXED_AMOUNT",
        value: 2000,
        min_order_amount: 10000,
        usage_limit: Some(50),
    },
    CouponFixture {
        code: "FREESHIP",
        kind: "FREE_SHIPPING",
        value: 0,
        min_order_amount: 7500,
        usage_limit: None,
    },
];

/// `(key, value, kind)`
pub const SETTINGS: [(&str, &str, &str); 5] = [
    ("store_name", "Rusty Threads", "string"),
    ("currency", "USD", "string"),
    ("tax_rate", "8.5", "number"),
    ("free_shipping_threshold", "7500", "number"),
    ("shipping_flat_rate", "599", "number"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFixture {
    pub name: String,
    pub value: String,
    pub sku: String,
    pub stock: i32,
}

/// One variant per size and color combination, each with a stock in `1..=50`.
pub fn variant_matrix<R: Rng>(product_sku: &str, rng: &mut R) -> Vec<VariantFixture> {
    let mut variants = Vec::with_capacity(SIZES.len() * COLORS.len());
    for size in SIZES {
        for color in COLORS {
            variants.push(VariantFixture {
                name: VARIANT_NAME.to_string(),
                value: format!("{size}/{color}"),
                sku: format!("{product_sku}-{size}-{}", color.to_uppercase()),
                stock: rng.gen_range(1..=50),
            });
        }
    }
    variants
}

/// Rows actually inserted by one run; all zero on a fully seeded database.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub categories: u64,
    pub products: u64,
    pub images: u64,
    pub variants: u64,
    pub reviews: u64,
    pub coupons: u64,
    pub settings: u64,
}

impl SeedReport {
    pub fn inserted(&self) -> u64 {
        self.users
            + self.categories
            + self.products
            + self.images
            + self.variants
            + self.reviews
            + self.coupons
            + self.settings
    }
}

/// Seed through the Postgres pool behind `conn`.
///
/// Panics if `conn` is not a Postgres connection.
pub async fn run(conn: &DatabaseConnection) -> anyhow::Result<SeedReport> {
    run_with_pool(conn.get_postgres_connection_pool()).await
}

pub async fn run_with_pool(pool: &PgPool) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for user in &USERS {
        report.users += ensure_user(pool, user).await?;
    }
    tracing::info!(inserted = report.users, "seeded users");

    for category in &CATEGORIES {
        report.categories += ensure_category(pool, category).await?;
    }
    tracing::info!(inserted = report.categories, "seeded categories");

    for product in &PRODUCTS {
        let category_id = id_by(pool, "categories", "slug", product.category).await?;
        report.products += ensure_product(pool, product, category_id).await?;
        let product_id = id_by(pool, "products", "sku", product.sku).await?;

        for (position, url) in product.images.iter().enumerate() {
            report.images += ensure_image(pool, product_id, url, product.name, position).await?;
        }

        let variants = variant_matrix(product.sku, &mut rand::thread_rng());
        for variant in &variants {
            report.variants += ensure_variant(pool, product_id, variant).await?;
        }
    }
    tracing::info!(
        products = report.products,
        images = report.images,
        variants = report.variants,
        "seeded products"
    );

    for review in &REVIEWS {
        let user_id = id_by(pool, "users", "email", review.user).await?;
        let product_id = id_by(pool, "products", "sku", review.product).await?;
        report.reviews += ensure_review(pool, user_id, product_id, review).await?;
    }
    tracing::info!(inserted = report.reviews, "seeded reviews");

    for coupon in &COUPONS {
        report.coupons += ensure_coupon(pool, coupon).await?;
    }
    tracing::info!(inserted = report.coupons, "seeded coupons");

    for (key, value, kind) in SETTINGS {
        report.settings += ensure_setting(pool, key, value, kind).await?;
    }
    tracing::info!(inserted = report.settings, "seeded settings");

    Ok(report)
}

async fn id_by(pool: &PgPool, table: &str, column: &str, value: &str) -> anyhow::Result<Uuid> {
    // Table and column names only ever come from the constants in this module.
    let sql = format!("SELECT id FROM {table} WHERE {column} = $1");
    let (id,): (Uuid,) = sqlx::query_as(&sql)
        .bind(value)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_user(pool: &PgPool, user: &UserFixture) -> anyhow::Result<u64> {
    let password_hash = hash_password(user.password)?;
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.email)
    .bind(password_hash)
    .bind(user.role.as_str())
    .bind(user.first_name)
    .bind(user.last_name)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_category(pool: &PgPool, category: &CategoryFixture) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO categories (id, name, slug, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (slug) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category.name)
    .bind(category.slug)
    .bind(category.description)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_product(
    pool: &PgPool,
    product: &ProductFixture,
    category_id: Uuid,
) -> anyhow::Result<u64> {
    // Both sku and slug are unique; a clash on either leaves the row alone.
    let result = sqlx::query(
        r#"
        INSERT INTO products (id, category_id, name, slug, sku, description,
                              old_price, new_price, cost_price, stock, is_featured, is_on_sale)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(product.name)
    .bind(product.slug)
    .bind(product.sku)
    .bind(product.description)
    .bind(product.old_price)
    .bind(product.new_price)
    .bind(product.cost_price)
    .bind(product.stock)
    .bind(product.is_featured)
    .bind(product.is_on_sale)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_image(
    pool: &PgPool,
    product_id: Uuid,
    url: &str,
    alt_text: &str,
    position: usize,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO product_images (id, product_id, url, alt_text, sort_order, is_primary)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (product_id, url) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(url)
    .bind(alt_text)
    .bind(position as i32)
    .bind(position == 0)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_variant(
    pool: &PgPool,
    product_id: Uuid,
    variant: &VariantFixture,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO product_variants (id, product_id, name, value, sku, stock)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(&variant.name)
    .bind(&variant.value)
    .bind(&variant.sku)
    .bind(variant.stock)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_review(
    pool: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
    review: &ReviewFixture,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO reviews (id, user_id, product_id, rating, title, comment, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        ON CONFLICT (user_id, product_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .bind(review.rating)
    .bind(review.title)
    .bind(review.comment)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_coupon(pool: &PgPool, coupon: &CouponFixture) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO coupons (id, code, kind, value, min_order_amount, usage_limit)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(coupon.code)
    .bind(coupon.kind)
    .bind(coupon.value)
    .bind(coupon.min_order_amount)
    .bind(coupon.usage_limit)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

async fn ensure_setting(pool: &PgPool, key: &str, value: &str, kind: &str) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO settings (id, key, value, kind)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(key)
    .bind(value)
    .bind(kind)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        entity::sea_orm_active_enums::{CouponType, SettingType},
        models::SettingValue,
        services::{coupon_service::validate_coupon, product_service::validate_prices},
    };

    #[test]
    fn variant_matrix_covers_every_size_and_color_once() {
        let variants = variant_matrix("TSH-CLASSIC", &mut StdRng::seed_from_u64(7));
        assert_eq!(variants.len(), SIZES.len() * COLORS.len());

        let values: HashSet<_> = variants.iter().map(|v| v.value.as_str()).collect();
        for size in SIZES {
            for color in COLORS {
                assert!(values.contains(format!("{size}/{color}").as_str()));
            }
        }
        let skus: HashSet<_> = variants.iter().map(|v| v.sku.as_str()).collect();
        assert_eq!(skus.len(), variants.len());
        assert!(variants.iter().all(|v| (1..=50).contains(&v.stock)));
    }

    #[test]
    fn variant_identity_does_not_depend_on_stock() {
        let a = variant_matrix("HOD-ZIP", &mut StdRng::seed_from_u64(1));
        let b = variant_matrix("HOD-ZIP", &mut StdRng::seed_from_u64(2));
        let key = |v: &VariantFixture| (v.name.clone(), v.value.clone(), v.sku.clone());
        assert_eq!(
            a.iter().map(key).collect::<Vec<_>>(),
            b.iter().map(key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn fixtures_reference_existing_keys() {
        let categories: HashSet<_> = CATEGORIES.iter().map(|c| c.slug).collect();
        let users: HashSet<_> = USERS.iter().map(|u| u.email).collect();
        let products: HashSet<_> = PRODUCTS.iter().map(|p| p.sku).collect();

        assert!(PRODUCTS.iter().all(|p| categories.contains(p.category)));
        assert!(REVIEWS.iter().all(|r| users.contains(r.user)));
        assert!(REVIEWS.iter().all(|r| products.contains(r.product)));

        let pairs: HashSet<_> = REVIEWS.iter().map(|r| (r.user, r.product)).collect();
        assert_eq!(pairs.len(), REVIEWS.len(), "one review per user per product");
    }

    #[test]
    fn fixtures_satisfy_the_admin_validation_rules() {
        for product in &PRODUCTS {
            assert!(validate_prices(product.new_price, product.old_price, Some(product.cost_price)).is_ok());
        }
        for coupon in &COUPONS {
            let kind = match coupon.kind {
                "PERCENTAGE" => CouponType::Percentage,
                "FIXED_AMOUNT" => CouponType::FixedAmount,
                _ => CouponType::FreeShipping,
            };
            assert!(validate_coupon(kind, coupon.value, coupon.min_order_amount).is_ok());
        }
        for (_, value, kind) in SETTINGS {
            let kind = if kind == "number" { SettingType::Number } else { SettingType::Text };
            assert!(SettingValue::parse(kind, value).is_some());
        }
    }

    #[test]
    fn exactly_one_admin_is_seeded() {
        assert_eq!(USERS.iter().filter(|u| u.role == Role::Admin).count(), 1);
    }
}
