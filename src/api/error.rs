//! Mapping from service errors to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::services::account_service::LoginError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidState(_) => StatusCode::CONFLICT,
            DomainError::Database(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            LoginError::Domain(e) => e.into_response(),
            LoginError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            LoginError::Locked(until) => (
                StatusCode::LOCKED,
                Json(json!({ "error": message, "locked_until": until })),
            )
                .into_response(),
        }
    }
}
