use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductDetail, ProductList, UpdateProductRequest},
    entity::{
        Categories, ProductImages, ProductVariants, Products, Reviews,
        categories::Column as CatCol,
        product_images::Column as ImageCol,
        product_variants::Column as VariantCol,
        products::{ActiveModel, Column},
        reviews::Column as ReviewCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::category_service::normalize_slug,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(slug) = query.category.as_ref().filter(|s| !s.is_empty()) {
        let category = Categories::find()
            .filter(CatCol::Slug.eq(slug.as_str()))
            .one(state.orm.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;
        condition = condition.add(Column::CategoryId.eq(category.id));
    }

    if let Some(featured) = query.featured {
        condition = condition.add(Column::IsFeatured.eq(featured));
    }

    if let Some(on_sale) = query.on_sale {
        condition = condition.add(Column::IsOnSale.eq(on_sale));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::NewPrice.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::NewPrice.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::NewPrice,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(state.orm.as_ref()).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

/// Product page: the product with its category, images, variants and reviews.
pub async fn get_product(state: &AppState, slug: &str) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find()
        .filter(Column::Slug.eq(slug))
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let category = Categories::find_by_id(product.category_id)
        .one(state.orm.as_ref())
        .await?
        .map(Into::into);

    let images = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product.id))
        .order_by_desc(ImageCol::IsPrimary)
        .order_by_asc(ImageCol::SortOrder)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let variants = ProductVariants::find()
        .filter(VariantCol::ProductId.eq(product.id))
        .order_by_asc(VariantCol::Sku)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let reviews = Reviews::find()
        .filter(ReviewCol::ProductId.eq(product.id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let detail = ProductDetail {
        product: product.into(),
        category,
        images,
        variants,
        reviews,
    };
    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn create_product(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    validate_prices(payload.new_price, payload.old_price, payload.cost_price)?;
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    let sku = payload.sku.trim().to_uppercase();
    if sku.is_empty() {
        return Err(AppError::BadRequest("sku is required".into()));
    }
    let slug = normalize_slug(&payload.slug)?;
    ensure_category(state, payload.category_id).await?;
    ensure_unique(state, Column::Slug, &slug, None).await?;
    ensure_unique(state, Column::Sku, &sku, None).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        slug: Set(slug),
        sku: Set(sku),
        description: Set(payload.description),
        old_price: Set(payload.old_price),
        new_price: Set(payload.new_price),
        cost_price: Set(payload.cost_price),
        stock: Set(payload.stock),
        is_featured: Set(payload.is_featured),
        is_on_sale: Set(payload.is_on_sale),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(state.orm.as_ref()).await?;

    audit::record(
        state,
        admin.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::ok("Product created", product.into()))
}

pub async fn update_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    validate_prices(
        payload.new_price.unwrap_or(existing.new_price),
        payload.old_price.or(existing.old_price),
        payload.cost_price.or(existing.cost_price),
    )?;

    let mut active: ActiveModel = existing.into();
    if let Some(category_id) = payload.category_id {
        ensure_category(state, category_id).await?;
        active.category_id = Set(category_id);
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(slug) = payload.slug {
        let slug = normalize_slug(&slug)?;
        ensure_unique(state, Column::Slug, &slug, Some(id)).await?;
        active.slug = Set(slug);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(old_price) = payload.old_price {
        active.old_price = Set(Some(old_price));
    }
    if let Some(new_price) = payload.new_price {
        active.new_price = Set(new_price);
    }
    if let Some(cost_price) = payload.cost_price {
        active.cost_price = Set(Some(cost_price));
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock cannot be negative".into()));
        }
        active.stock = Set(stock);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    if let Some(is_on_sale) = payload.is_on_sale {
        active.is_on_sale = Set(is_on_sale);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(state.orm.as_ref()).await?;

    audit::record(
        state,
        admin.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", product.into()))
}

pub async fn delete_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(state.orm.as_ref()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        admin.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

/// Prices are minor units; an old price, when given, must exceed the current one.
pub fn validate_prices(new_price: i64, old_price: Option<i64>, cost_price: Option<i64>) -> AppResult<()> {
    if new_price < 0 {
        return Err(AppError::BadRequest("new_price cannot be negative".into()));
    }
    if let Some(old) = old_price {
        if old <= new_price {
            return Err(AppError::BadRequest(
                "old_price must be greater than new_price".into(),
            ));
        }
    }
    if cost_price.is_some_and(|c| c < 0) {
        return Err(AppError::BadRequest("cost_price cannot be negative".into()));
    }
    Ok(())
}

async fn ensure_category(state: &AppState, id: Uuid) -> AppResult<()> {
    match Categories::find_by_id(id).one(state.orm.as_ref()).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("category {id} does not exist"))),
    }
}

async fn ensure_unique(
    state: &AppState,
    column: Column,
    value: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let taken = Products::find()
        .filter(column.eq(value))
        .one(state.orm.as_ref())
        .await?;
    match taken {
        Some(p) if Some(p.id) != except => Err(AppError::BadRequest(format!(
            "'{value}' is already used by another product"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_price_must_be_a_discount() {
        assert!(validate_prices(1000, Some(1500), Some(400)).is_ok());
        assert!(validate_prices(1000, Some(1000), None).is_err());
        assert!(validate_prices(-1, None, None).is_err());
        assert!(validate_prices(1000, None, Some(-3)).is_err());
    }
}
