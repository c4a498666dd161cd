use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::auth::register,
        api::auth::get_me,
        api::inventory::list_departments,
        api::inventory::department_inventory,
        api::inventory::availability,
        api::inventory::adjust_stock,
        api::cart::get_cart,
        api::cart::add_to_cart,
        api::cart::update_quantity,
        api::cart::remove_item,
        api::cart::clear_cart,
        api::cart::cart_summary,
        api::cart::validate_cart,
        api::borrow::submit_form,
        api::borrow::list_forms,
        api::borrow::my_forms,
        api::borrow::find_by_reference,
        api::borrow::approve,
        api::borrow::reject,
        api::borrow::issue,
        api::borrow::mark_returned,
    ),
    components(
        schemas(
            crate::domain::InventoryItem,
            crate::domain::CartItem,
            crate::domain::BorrowLine,
            crate::domain::BorrowForm,
            crate::domain::BorrowStatus,
            crate::services::cart_service::CartWithLimits,
            crate::services::cart_service::CartSummary,
            api::auth::LoginRequest,
            api::auth::LoginResponse,
            api::auth::RegisterRequest,
            api::auth::AccountView,
            api::inventory::AdjustStockRequest,
            api::cart::AddToCartRequest,
            api::cart::UpdateQuantityRequest,
            api::borrow::SubmitFormRequest,
            api::borrow::RejectRequest,
        )
    ),
    tags(
        (name = "toolroom", description = "Toolroom borrowing API")
    )
)]
pub struct ApiDoc;
