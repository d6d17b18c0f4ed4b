//! Liveness, readiness and service identity.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::time::Instant;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 200 when the pool can run a trivial query, 503 otherwise.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "latency_ms": started.elapsed().as_millis() as u64
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}

async fn version() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "application": &*state.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/api-docs/openapi.json",
        "status": "online"
    }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
