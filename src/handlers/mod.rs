// src/handlers/mod.rs

pub mod comments;
pub mod complaints;
pub mod reactions;

use axum::{Json, response::IntoResponse};

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
