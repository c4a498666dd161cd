use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::models::user;
use crate::services::account_service::{self, RegisterStudent};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email
    username: String,
    password: String,
}

/// Account fields safe to hand to clients
#[derive(Serialize, ToSchema)]
pub struct AccountView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub name: String,
    pub student_number: String,
}

impl From<user::Model> for AccountView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            name: model.name,
            student_number: model.student_number,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    token: String,
    user: AccountView,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed bearer token", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 423, description = "Account temporarily locked")
    )
)]
pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    match account_service::login(&db, &payload.username, &payload.password).await {
        Ok((token, account)) => (
            StatusCode::OK,
            Json(LoginResponse {
                token,
                user: account.into(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    student_number: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Student account created", body = AccountView),
        (status = 400, description = "Invalid or duplicate details")
    )
)]
pub async fn register(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let request = RegisterStudent {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        name: payload.name,
        student_number: payload.student_number,
    };

    match account_service::register_student(&db, request).await {
        Ok(account) => (StatusCode::CREATED, Json(AccountView::from(account))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller's account under `user`"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_me(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> impl IntoResponse {
    match account_service::find_by_email(&db, &claims.sub).await {
        Ok(Some(account)) => Json(json!({ "user": AccountView::from(account) })).into_response(),
        Ok(None) => DomainError::NotFound("Account".to_string()).into_response(),
        Err(e) => e.into_response(),
    }
}
