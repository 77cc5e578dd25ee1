use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    entity::{
        Categories, Products,
        categories::{ActiveModel, Column},
        products::Column as ProdCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(Column::Name)
        .all(state.orm.as_ref())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn get_category(state: &AppState, slug: &str) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find()
        .filter(Column::Slug.eq(slug))
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Category", category.into()))
}

pub async fn create_category(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let slug = normalize_slug(&payload.slug)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    ensure_slug_free(state, &slug, None).await?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        created_at: NotSet,
    }
    .insert(state.orm.as_ref())
    .await?;

    audit::record(
        state,
        admin.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Category created", category.into()))
}

pub async fn update_category(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(slug) = payload.slug {
        let slug = normalize_slug(&slug)?;
        ensure_slug_free(state, &slug, Some(id)).await?;
        active.slug = Set(slug);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    let category = active.update(state.orm.as_ref()).await?;

    audit::record(
        state,
        admin.user_id,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", category.into()))
}

pub async fn delete_category(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(state.orm.as_ref())
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(format!(
            "category still has {in_use} products"
        )));
    }

    let result = Categories::delete_by_id(id).exec(state.orm.as_ref()).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        admin.user_id,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}

async fn ensure_slug_free(state: &AppState, slug: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken = Categories::find()
        .filter(Column::Slug.eq(slug))
        .one(state.orm.as_ref())
        .await?;
    match taken {
        Some(c) if Some(c.id) != except => {
            Err(AppError::BadRequest(format!("slug '{slug}' is already used")))
        }
        _ => Ok(()),
    }
}

/// Lowercase, ASCII alphanumerics and single dashes.
pub fn normalize_slug(raw: &str) -> AppResult<String> {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c == '-' || c == ' ' || c == '_') && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        return Err(AppError::BadRequest("slug is required".into()));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_normalized() {
        assert_eq!(normalize_slug("  Men's Clothing ").unwrap(), "mens-clothing");
        assert_eq!(normalize_slug("t_shirts--summer").unwrap(), "t-shirts-summer");
    }

    #[test]
    fn empty_slug_is_rejected() {
        assert!(normalize_slug(" -- ").is_err());
    }
}
