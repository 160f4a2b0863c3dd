pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use clock::{Clock, SystemClock};
use db::{Db, MockDb};
use services::events::ScanEvents;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Db,
    pub config: config::AppConfig,
    pub clock: Arc<dyn Clock>,
    pub events: ScanEvents,
}

impl AppState {
    /// State backed by the system clock, seeded according to `config.seed`.
    pub fn new(config: config::AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: config::AppConfig, clock: Arc<dyn Clock>) -> Self {
        let store = if config.seed {
            MockDb::seeded(&config.verify_token, clock.now())
        } else {
            MockDb::empty()
        };

        Self {
            db: db::create_store(store),
            config,
            clock,
            events: ScanEvents::default(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
