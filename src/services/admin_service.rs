use axum::extract::Multipart;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        products::{CreateVariantRequest, UpdateVariantRequest},
        uploads::{ProductImageUpload, StoredFile, UploadResult},
    },
    entity::{
        ProductImages, ProductVariants, Products,
        products,
        product_images::{ActiveModel as ImageActive, Column as ImageCol},
        product_variants::{ActiveModel as VariantActive, Column as VariantCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{ProductImage, ProductVariant},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_variant(
    state: &AppState,
    admin: &AdminUser,
    product_id: Uuid,
    payload: CreateVariantRequest,
) -> AppResult<ApiResponse<ProductVariant>> {
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    let name = payload.name.trim().to_string();
    let value = payload.value.trim().to_string();
    let sku = payload.sku.trim().to_uppercase();
    if name.is_empty() || value.is_empty() || sku.is_empty() {
        return Err(AppError::BadRequest("name, value and sku are required".into()));
    }

    Products::find_by_id(product_id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let duplicate = ProductVariants::find()
        .filter(
            Condition::any()
                .add(VariantCol::Sku.eq(sku.as_str()))
                .add(
                    Condition::all()
                        .add(VariantCol::ProductId.eq(product_id))
                        .add(VariantCol::Name.eq(name.as_str()))
                        .add(VariantCol::Value.eq(value.as_str())),
                ),
        )
        .count(state.orm.as_ref())
        .await?;
    if duplicate > 0 {
        return Err(AppError::BadRequest(format!(
            "variant {name}={value} or sku {sku} already exists"
        )));
    }

    let variant = VariantActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        name: Set(name),
        value: Set(value),
        sku: Set(sku),
        stock: Set(payload.stock),
        price_delta: Set(payload.price_delta),
    }
    .insert(state.orm.as_ref())
    .await?;

    audit::record(
        state,
        admin.user_id,
        "variant_create",
        "product_variants",
        serde_json::json!({ "product_id": product_id, "variant_id": variant.id }),
    )
    .await;

    Ok(ApiResponse::ok("Variant created", variant.into()))
}

/// Variant stock is independent of the parent product's stock.
pub async fn update_variant(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateVariantRequest,
) -> AppResult<ApiResponse<ProductVariant>> {
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let txn = state.orm.begin().await?;
    let variant = ProductVariants::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: VariantActive = variant.into();
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(price_delta) = payload.price_delta {
        active.price_delta = Set(price_delta);
    }
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        state,
        admin.user_id,
        "variant_update",
        "product_variants",
        serde_json::json!({ "variant_id": updated.id, "stock": updated.stock }),
    )
    .await;

    Ok(ApiResponse::ok("Variant updated", updated.into()))
}

pub async fn delete_variant(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductVariants::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        admin.user_id,
        "variant_delete",
        "product_variants",
        serde_json::json!({ "variant_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

pub async fn upload_media(
    state: &AppState,
    admin: &AdminUser,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResult>> {
    let files = state.uploads.store(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::BadRequest("no files in upload".into()));
    }

    audit::record(
        state,
        admin.user_id,
        "media_upload",
        "uploads",
        serde_json::json!({ "files": files.iter().map(|f| &f.filename).collect::<Vec<_>>() }),
    )
    .await;

    let meta = Meta::total(files.len());
    Ok(ApiResponse::success("Uploaded", UploadResult { files }, Some(meta)))
}

/// Store uploaded files and attach them to the product as images, after any
/// existing ones. The first image of a product becomes its primary image.
pub async fn upload_product_images(
    state: &AppState,
    admin: &AdminUser,
    product_id: Uuid,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<ProductImageUpload>> {
    let product = Products::find_by_id(product_id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let files = state.uploads.store(&mut multipart).await?;
    if files.is_empty() {
        return Err(AppError::BadRequest("no files in upload".into()));
    }

    let images = match attach_images(state, &product, &files).await {
        Ok(images) => images,
        Err(err) => {
            state.uploads.discard(&files).await;
            return Err(err);
        }
    };

    audit::record(
        state,
        admin.user_id,
        "product_images_upload",
        "product_images",
        serde_json::json!({ "product_id": product.id, "count": images.len() }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Images uploaded",
        ProductImageUpload { files, images },
    ))
}

async fn attach_images(
    state: &AppState,
    product: &products::Model,
    files: &[StoredFile],
) -> AppResult<Vec<ProductImage>> {
    let txn = state.orm.begin().await?;
    let existing = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product.id))
        .count(&txn)
        .await? as i32;

    let mut images: Vec<ProductImage> = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let position = existing + index as i32;
        let image = ImageActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            url: Set(file.url.clone()),
            alt_text: Set(Some(product.name.clone())),
            sort_order: Set(position),
            is_primary: Set(position == 0),
        }
        .insert(&txn)
        .await?;
        images.push(image.into());
    }
    txn.commit().await?;
    Ok(images)
}

pub async fn delete_image(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductImages::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        admin.user_id,
        "product_image_delete",
        "product_images",
        serde_json::json!({ "image_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
