//! Cart API handlers; every route acts on the caller's own cart

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::Claims;
use crate::domain::CartItem;
use crate::infrastructure::AppState;
use crate::services::cart_service;
use crate::services::inventory_service::{self, CartUpdate};

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart rows with the stock of their departments", body = cart_service::CartWithLimits),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_cart(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    match cart_service::cart_with_limits(
        state.cart_repo.as_ref(),
        state.inventory_repo.as_ref(),
        &claims.sub,
    )
    .await
    {
        Ok(cart) => Json(cart).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub department: String,
    pub item_name: String,
    pub quantity: i32,
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Cart row after merging", body = CartItem),
        (status = 400, description = "Out of stock, over the per-student cap, or unknown item")
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<AddToCartRequest>,
) -> impl IntoResponse {
    match inventory_service::add_to_cart(
        state.db(),
        &claims.sub,
        &payload.department,
        &payload.item_name,
        payload.quantity,
    )
    .await
    {
        Ok(row) => (StatusCode::CREATED, Json(CartItem::from(row))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    /// Zero or less removes the row
    pub quantity: i32,
}

#[utoipa::path(
    put,
    path = "/api/cart/{id}",
    params(("id" = i32, Path, description = "Cart row id")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated row as `item`, or `removed: true`"),
        (status = 400, description = "Over the stock or per-student cap"),
        (status = 404, description = "Row not in the caller's cart")
    )
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> impl IntoResponse {
    match inventory_service::update_cart_quantity(state.db(), id, &claims.sub, payload.quantity)
        .await
    {
        Ok(CartUpdate::Updated(row)) => Json(json!({ "item": CartItem::from(row) })).into_response(),
        Ok(CartUpdate::Removed) => Json(json!({ "removed": true })).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(("id" = i32, Path, description = "Cart row id")),
    responses(
        (status = 204, description = "Row removed"),
        (status = 404, description = "Row not in the caller's cart")
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.cart_repo.remove(id, &claims.sub).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Number of rows removed")
    )
)]
pub async fn clear_cart(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    match cart_service::clear_cart(state.cart_repo.as_ref(), &claims.sub).await {
        Ok(removed) => Json(json!({ "removed": removed })).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/cart/summary",
    responses(
        (status = 200, description = "Units and distinct rows in the cart", body = cart_service::CartSummary)
    )
)]
pub async fn cart_summary(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    match cart_service::cart_summary(state.cart_repo.as_ref(), &claims.sub).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/cart/validate",
    responses(
        (status = 200, description = "`valid` flag and one message per line that no longer fits")
    )
)]
pub async fn validate_cart(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    match cart_service::validate_cart(
        state.cart_repo.as_ref(),
        state.inventory_repo.as_ref(),
        &claims.sub,
    )
    .await
    {
        Ok(problems) => Json(json!({
            "valid": problems.is_empty(),
            "errors": problems
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
