//! Route definitions for the HYOW mock API.

pub mod domains;
pub mod health;
pub mod mock;
pub mod scans;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::middleware::latency;
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let domain_routes = Router::new()
        .route("/domains", get(domains::list))
        .route("/domains/verify", post(domains::verify))
        .route(
            "/domains/{id}",
            get(domains::get_by_id)
                .patch(domains::update)
                .delete(domains::remove),
        )
        .route(
            "/domains/{id}/scans",
            get(domains::list_scans).delete(domains::remove_scans),
        );

    let scan_routes = Router::new()
        .route("/scans", get(scans::list).post(scans::create))
        .route("/scans/passive", post(scans::passive))
        .route("/scans/events", get(scans::events))
        .route("/scans/{id}", get(scans::get_by_id).delete(scans::remove))
        .route("/scans/{id}/complete", post(scans::complete));

    let mock_routes = Router::new().route("/mock/reset", post(mock::reset));

    let api = domain_routes
        .merge(scan_routes)
        .merge(mock_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            latency::simulate_latency,
        ));

    let cors = match HeaderValue::from_str(&state.config.frontend_url) {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
