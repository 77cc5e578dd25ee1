use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::CreateReviewRequest,
    entity::{
        Products, Reviews,
        products::Column as ProductCol,
        reviews::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    state::AppState,
};

/// One review per user per product; later attempts are rejected, not merged.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    product_slug: &str,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let product_id = Products::find()
        .filter(ProductCol::Slug.eq(product_slug))
        .one(state.orm.as_ref())
        .await?
        .ok_or(AppError::NotFound)?
        .id;

    let existing = Reviews::find()
        .filter(Column::UserId.eq(user.user_id))
        .filter(Column::ProductId.eq(product_id))
        .one(state.orm.as_ref())
        .await?;
    if existing.is_some() {
        return Err(already_reviewed());
    }

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(product_id),
        rating: Set(payload.rating),
        title: Set(payload.title),
        comment: Set(payload.comment),
        is_verified: Set(false),
        created_at: NotSet,
    }
    .insert(state.orm.as_ref())
    .await
    .map_err(insert_error)?;

    audit::record(
        state,
        user.user_id,
        "review_create",
        "reviews",
        serde_json::json!({ "review_id": review.id, "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::ok("Review created", review.into()))
}

fn already_reviewed() -> AppError {
    AppError::BadRequest("You have already reviewed this product".into())
}

/// A concurrent review can pass the lookup above and still lose on the
/// `(user_id, product_id)` unique key.
fn insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => already_reviewed(),
        _ => AppError::OrmError(err),
    }
}
