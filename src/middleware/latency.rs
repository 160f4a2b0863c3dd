//! Artificial network latency so the frontend sees realistic loading states.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use rand::Rng;

use crate::AppState;

/// Delay every request by a uniform random duration within the configured range.
pub async fn simulate_latency(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(delay) = pick_delay(state.config.latency_range()) {
        tokio::time::sleep(delay).await;
    }
    next.run(request).await
}

fn pick_delay(range: Option<(Duration, Duration)>) -> Option<Duration> {
    let (min, max) = range?;
    let (min_ms, max_ms) = (min.as_millis() as u64, max.as_millis() as u64);
    let ms = if max_ms > min_ms {
        rand::rng().random_range(min_ms..=max_ms)
    } else {
        min_ms
    };
    Some(Duration::from_millis(ms))
}
