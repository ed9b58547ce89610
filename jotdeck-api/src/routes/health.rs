/// Health check endpoint
///
/// `GET /health` — public, verifies the database is reachable. Returns 200
/// with status JSON, or 503 when the pool fails the check.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use jotdeck_shared::db::pool::health_check as db_health_check;
use serde_json::{json, Value};

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db_health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
