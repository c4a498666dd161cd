//! Borrow form API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::Claims;
use crate::domain::{BorrowStatus, DomainError, Role};
use crate::infrastructure::AppState;
use crate::services::{account_service, borrow_service};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFormRequest {
    pub professor_email: String,
    pub subject_code: String,
}

#[utoipa::path(
    post,
    path = "/api/borrow-forms",
    request_body = SubmitFormRequest,
    responses(
        (status = 201, description = "Pending form built from the caller's cart", body = crate::domain::BorrowForm),
        (status = 400, description = "Empty cart or missing details")
    )
)]
pub async fn submit_form(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<SubmitFormRequest>,
) -> impl IntoResponse {
    let student = match account_service::find_by_email(state.db(), &claims.sub).await {
        Ok(Some(account)) => account,
        Ok(None) => return DomainError::NotFound("Account".to_string()).into_response(),
        Err(e) => return e.into_response(),
    };

    let request = borrow_service::NewBorrowRequest {
        student_email: student.email,
        student_name: student.name,
        student_number: student.student_number,
        professor_email: payload.professor_email.trim().to_owned(),
        subject_code: payload.subject_code,
    };

    match borrow_service::create_from_cart(state.db(), request).await {
        Ok(form) => (StatusCode::CREATED, Json(form)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormListQuery {
    /// pending (default), approved, rejected, issued or returned
    pub status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/borrow-forms",
    params(FormListQuery),
    responses(
        (status = 200, description = "Forms in the requested state", body = [crate::domain::BorrowForm]),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_forms(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<FormListQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_decide_forms) {
        return rejection.into_response();
    }

    let status = match query.status.as_deref() {
        None | Some("") => BorrowStatus::Pending,
        Some(raw) => match raw.parse::<BorrowStatus>() {
            Ok(status) => status,
            Err(e) => return e.into_response(),
        },
    };

    let forms = state.borrow_repo.as_ref();
    let result = match status {
        BorrowStatus::Pending => borrow_service::pending_forms(forms).await,
        BorrowStatus::Approved => borrow_service::approved_not_issued(forms).await,
        BorrowStatus::Issued => borrow_service::issued_not_returned(forms).await,
        other => forms.find_by_status(other).await,
    };

    match result {
        Ok(forms) => Json(forms).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/borrow-forms/mine",
    responses(
        (status = 200, description = "Caller's forms, newest first", body = [crate::domain::BorrowForm]),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn my_forms(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    match borrow_service::forms_for_student(state.borrow_repo.as_ref(), &claims.sub).await {
        Ok(forms) => Json(forms).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Students may only look up their own forms; other codes read as unknown
#[utoipa::path(
    get,
    path = "/api/borrow-forms/reference/{code}",
    params(("code" = String, Path, description = "Reference code, e.g. BRW-20250101120000-ABCD")),
    responses(
        (status = 200, description = "The form", body = crate::domain::BorrowForm),
        (status = 404, description = "Unknown form")
    )
)]
pub async fn find_by_reference(
    State(state): State<AppState>,
    claims: Claims,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let form = match borrow_service::find_by_reference(state.borrow_repo.as_ref(), &code).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let is_staff = claims.role().is_some_and(|r| r.can_decide_forms());
    if !is_staff && form.student_email != claims.sub {
        return DomainError::NotFound("Form".to_string()).into_response();
    }

    Json(form).into_response()
}

#[utoipa::path(
    put,
    path = "/api/borrow-forms/{id}/approve",
    params(("id" = i32, Path, description = "Borrow form id")),
    responses(
        (status = 200, description = "Approved form", body = crate::domain::BorrowForm),
        (status = 404, description = "Unknown form"),
        (status = 409, description = "Form already processed")
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_decide_forms) {
        return rejection.into_response();
    }

    match borrow_service::approve(state.db(), id, &claims.sub).await {
        Ok(form) => Json(form).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

#[utoipa::path(
    put,
    path = "/api/borrow-forms/{id}/reject",
    params(("id" = i32, Path, description = "Borrow form id")),
    request_body(content = RejectRequest, description = "Optional reason"),
    responses(
        (status = 200, description = "Rejected form", body = crate::domain::BorrowForm),
        (status = 404, description = "Unknown form"),
        (status = 409, description = "Form already processed")
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    payload: Option<Json<RejectRequest>>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_decide_forms) {
        return rejection.into_response();
    }

    let Json(payload) = payload.unwrap_or_default();
    match borrow_service::reject(state.db(), id, &claims.sub, &payload.reason).await {
        Ok(form) => Json(form).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/borrow-forms/{id}/issue",
    params(("id" = i32, Path, description = "Borrow form id")),
    responses(
        (status = 200, description = "Items handed out, stock decremented", body = crate::domain::BorrowForm),
        (status = 400, description = "Not enough stock for at least one line"),
        (status = 409, description = "Form is not approved or already issued")
    )
)]
pub async fn issue(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_manage_stock) {
        return rejection.into_response();
    }

    match borrow_service::issue(state.db(), id).await {
        Ok(form) => Json(form).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/borrow-forms/{id}/return",
    params(("id" = i32, Path, description = "Borrow form id")),
    responses(
        (status = 200, description = "Items back on the shelf", body = crate::domain::BorrowForm),
        (status = 409, description = "Form was not issued")
    )
)]
pub async fn mark_returned(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(rejection) = claims.require(Role::can_manage_stock) {
        return rejection.into_response();
    }

    match borrow_service::mark_returned(state.db(), id).await {
        Ok(form) => Json(form).into_response(),
        Err(e) => e.into_response(),
    }
}
