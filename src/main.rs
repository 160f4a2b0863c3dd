use std::net::SocketAddr;
use std::time::Duration;

use hyow_mock::config::AppConfig;
use hyow_mock::services::sweeper;
use hyow_mock::{routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hyow_mock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = AppState::new(config);
    tracing::info!(
        seeded = state.config.seed,
        completion_ms = state.config.scan_completion_ms,
        latency = state.config.latency_enabled,
        "Mock store ready"
    );

    if state.config.sweep_interval_ms > 0 {
        sweeper::spawn(
            state.db.clone(),
            state.events.clone(),
            state.clock.clone(),
            state.config.completion_window(),
            Duration::from_millis(state.config.sweep_interval_ms),
        );
    }

    tracing::info!(host = %addr, "Starting HYOW mock API server");

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
