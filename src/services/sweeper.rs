//! Background completion sweep.
//!
//! Runs the same transition as a read on a fixed interval so running scans
//! complete (and subscribers hear about it) without anyone polling.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::db::Db;
use crate::services::events::ScanEvents;
use crate::services::lifecycle;

/// Run one sweep. Returns how many scans completed.
pub async fn sweep_once(
    db: &Db,
    events: &ScanEvents,
    clock: &dyn Clock,
    window: ChronoDuration,
) -> usize {
    let mut guard = db.lock().await;
    lifecycle::refresh_running(&mut guard, events, clock.now(), window).len()
}

/// Spawn the periodic sweep on the tokio runtime.
pub fn spawn(
    db: Db,
    events: ScanEvents,
    clock: Arc<dyn Clock>,
    window: ChronoDuration,
    interval: Duration,
) -> JoinHandle<()> {
    tracing::info!(interval_ms = interval.as_millis() as u64, "Starting scan sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let completed = sweep_once(&db, &events, clock.as_ref(), window).await;
            if completed > 0 {
                tracing::debug!(completed, "Sweeper completed scans");
            }
        }
    })
}
