use axum::{Json, extract::State, http::StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn health_check(State(db): State<DatabaseConnection>) -> (StatusCode, Json<Value>) {
    let (status, database) = match db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status.is_success() { "ok" } else { "degraded" },
            "service": "toolroom",
            "database": database,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
