//! Mock store administration.

use axum::{extract::State, http::StatusCode};

use crate::AppState;

/// POST /api/mock/reset: restore the demo dataset.
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    let mut db = state.db.lock().await;
    db.reset(&state.config.verify_token, state.now());
    tracing::info!("Mock store reset to seed data");
    StatusCode::NO_CONTENT
}
