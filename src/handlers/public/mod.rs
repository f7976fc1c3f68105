// handlers/public/mod.rs - Public handlers (no authentication required)

use axum::{extract::State, http::Uri};
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::error::ApiError;
use crate::routes::AppState;

/// GET / - service banner
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Back-office API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "forms": "/api/v1/forms (protected)",
            "workflows": "/api/v1/workflows (protected)",
            "users": "/api/v1/users, /api/v1/users_with_{skills,contacts,socials} (protected)",
            "notifications": "/api/v1/notifications (protected), /api/v1/notifications/ws?token= (socket)"
        }
    })))
}

/// GET /health - database ping
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "database": "ok",
        "timestamp": chrono::Utc::now(),
    })))
}

/// Fallback for unmatched paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
