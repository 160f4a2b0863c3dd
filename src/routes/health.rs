//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub domains: usize,
    pub scans: usize,
}

/// Liveness probe: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: reports the size of the in-memory store.
pub async fn ready(State(state): State<AppState>) -> Json<HealthStatus> {
    let db = state.db.lock().await;
    Json(HealthStatus {
        status: "ok".to_string(),
        domains: db.domains.len(),
        scans: db.scans.len(),
    })
}
