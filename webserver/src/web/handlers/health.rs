//! Liveness endpoint

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use crate::web::ApiState;

/// Health check endpoint
pub async fn health_check(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "uptime": state.server.get_uptime_seconds(),
        "requests": state.server.get_request_count(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
