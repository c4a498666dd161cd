// Server module - Router assembly and the listening loop used by main.rs

use axum::{Router, http::HeaderValue};
use sea_orm::DatabaseConnection;
use std::net::{SocketAddr, TcpListener};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;
use crate::infrastructure::config::Config;

/// Build the full application router: API, docs, CORS and request tracing
pub fn build_router(db: DatabaseConnection, cors_allowed_origins: &[String]) -> Router {
    let state = AppState::new(db);
    let api_router = api::api_router_with_state(state);

    let mut origins = Vec::new();
    for origin in cors_allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    // No configured origins means a same-origin deployment; keep CORS permissive for local tools
    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Find an available port starting from the preferred port
pub fn find_available_port(preferred_port: u16) -> Option<u16> {
    // Try preferred port first
    if TcpListener::bind(("0.0.0.0", preferred_port)).is_ok() {
        return Some(preferred_port);
    }

    // Scan next 100 ports
    (preferred_port.saturating_add(1)..(preferred_port.saturating_add(100)))
        .find(|&port| TcpListener::bind(("0.0.0.0", port)).is_ok())
}

/// Serve until Ctrl-C
pub async fn run(config: &Config, db: DatabaseConnection) -> Result<(), String> {
    let port = find_available_port(config.port)
        .ok_or_else(|| "Failed to find available port".to_string())?;

    if port != config.port {
        tracing::warn!(
            "Preferred port {} was not available, using port {} instead",
            config.port,
            port
        );
    }

    let app = build_router(db, &config.cors_allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Toolroom server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
