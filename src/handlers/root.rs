// handlers/root.rs - welcome, health and fallback routes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::Store;

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the REST API project!" }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(store): State<Store>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}

/// Any route that matched nothing
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route Not Found" })))
}
