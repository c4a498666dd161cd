//! Inventory API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::Claims;
use crate::domain::Role;
use crate::infrastructure::AppState;
use crate::services::inventory_service;

#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments with at least one active item", body = [String])
    )
)]
pub async fn list_departments(State(state): State<AppState>) -> impl IntoResponse {
    match state.inventory_repo.list_departments().await {
        Ok(departments) => Json(departments).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentQuery {
    pub department: String,
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "Active items of the department, by name", body = [crate::domain::InventoryItem])
    )
)]
pub async fn department_inventory(
    State(state): State<AppState>,
    Query(query): Query<DepartmentQuery>,
) -> impl IntoResponse {
    match state
        .inventory_repo
        .find_by_department(&query.department)
        .await
    {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub department: String,
    pub item_name: String,
}

#[utoipa::path(
    get,
    path = "/api/inventory/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Units on the shelf; zero for unknown items")
    )
)]
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    match state
        .inventory_repo
        .available_quantity(&query.department, &query.item_name)
        .await
    {
        Ok(available) => Json(json!({
            "department": query.department,
            "item_name": query.item_name,
            "available_quantity": available
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStockRequest {
    /// Units to add (positive) or remove (negative)
    pub delta: i32,
}

#[utoipa::path(
    put,
    path = "/api/inventory/{id}/adjust",
    params(("id" = i32, Path, description = "Inventory item id")),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Item after the correction", body = crate::domain::InventoryItem),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<AdjustStockRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_manage_stock) {
        return rejection.into_response();
    }

    match inventory_service::adjust_available_quantity(state.db(), id, payload.delta).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => e.into_response(),
    }
}
