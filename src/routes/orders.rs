use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde_json::Value;

use crate::{
    dto::orders::CreateOrderRequest,
    error::AppResult,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/{order_id}/capture", post(capture_order))
}

/// The provider's order body is returned as-is, not wrapped.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Provider order, includes `id`", body = serde_json::Value),
        (status = 400, description = "Empty or invalid cart"),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Value>> {
    let order = payment_service::create_order(state.payments.as_ref(), payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/capture",
    params(("order_id" = String, Path, description = "Provider order ID")),
    responses(
        (status = 200, description = "Provider capture, see purchase_units[0].payments.captures[0]", body = serde_json::Value),
        (status = 502, description = "Payment provider error"),
    ),
    tag = "Orders"
)]
pub async fn capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Value>> {
    let capture = payment_service::capture_order(state.payments.as_ref(), &order_id).await?;
    Ok(Json(capture))
}
