pub mod auth;
pub mod borrow;
pub mod cart;
pub mod error;
pub mod health;
pub mod inventory;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::get_me))
        // Inventory
        .route("/departments", get(inventory::list_departments))
        .route("/inventory", get(inventory::department_inventory))
        .route("/inventory/availability", get(inventory::availability))
        .route("/inventory/:id/adjust", put(inventory::adjust_stock))
        // Cart
        .route(
            "/cart",
            get(cart::get_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route("/cart/summary", get(cart::cart_summary))
        .route("/cart/validate", get(cart::validate_cart))
        .route(
            "/cart/:id",
            put(cart::update_quantity).delete(cart::remove_item),
        )
        // Borrow forms
        .route(
            "/borrow-forms",
            get(borrow::list_forms).post(borrow::submit_form),
        )
        .route("/borrow-forms/mine", get(borrow::my_forms))
        .route(
            "/borrow-forms/reference/:code",
            get(borrow::find_by_reference),
        )
        .route("/borrow-forms/:id/approve", put(borrow::approve))
        .route("/borrow-forms/:id/reject", put(borrow::reject))
        .route("/borrow-forms/:id/issue", put(borrow::issue))
        .route("/borrow-forms/:id/return", put(borrow::mark_returned))
        .with_state(state)
}
