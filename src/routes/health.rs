use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Reports liveness plus whether the credential store is readable.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let store_status = match state.users.ping().await {
        Ok(()) => "available",
        Err(e) => {
            tracing::error!("User store health check failed: {:?}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": if store_status == "available" { "healthy" } else { "unhealthy" },
        "store": store_status,
        "backend": state.backend.name(),
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Probe the configured generation backend
pub async fn backend_status(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.backend.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "connected",
                "backend": state.backend.name(),
                "message": format!("{} is running", state.backend.name()),
            })),
        ),
        Err(e) => {
            tracing::warn!("Backend {} unreachable: {}", state.backend.name(), e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "backend": state.backend.name(),
                    "message": format!("{} is not running", state.backend.name()),
                })),
            )
        }
    }
}
