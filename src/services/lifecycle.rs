//! Scan lifecycle simulator.
//!
//! Running scans advance with wall-clock time measured from `created_at`.
//! Progress is recomputed on every read; once the completion window has
//! elapsed the scan transitions to `COMPLETED` exactly once, producing its
//! findings and AI summary and updating the owning domain's stats.

use chrono::{DateTime, Duration, Utc};

use crate::db::MockDb;
use crate::models::finding::Finding;
use crate::models::scan::{ScanRecord, ScanStatus};
use crate::services::events::{ScanEvent, ScanEvents};
use crate::services::{findings, summary};

/// Highest progress a scan can report before it completes.
pub const MAX_RUNNING_PROGRESS: u8 = 95;

/// Summary placeholder used when a scan is created without one.
pub const PLACEHOLDER_SUMMARY: &str = "Security scan summary placeholder.";

/// Time-derived progress of a running scan, never below its stored value.
pub fn progress_at(scan: &ScanRecord, now: DateTime<Utc>, window: Duration) -> u8 {
    match scan.target_status {
        ScanStatus::Completed => return 100,
        ScanStatus::Failed => return 0,
        _ => {}
    }

    let elapsed = (now - scan.created_at).num_milliseconds().max(0) as f64;
    let window_ms = window.num_milliseconds();
    let computed = if window_ms <= 0 {
        MAX_RUNNING_PROGRESS
    } else {
        (elapsed / window_ms as f64 * 100.0)
            .round()
            .min(MAX_RUNNING_PROGRESS as f64) as u8
    };

    computed.max(scan.progress).min(MAX_RUNNING_PROGRESS)
}

/// Whether a running scan has been running for the full completion window.
pub fn is_due(scan: &ScanRecord, now: DateTime<Utc>, window: Duration) -> bool {
    scan.target_status == ScanStatus::Running && now - scan.created_at >= window
}

/// Advance every running scan. Returns the ids of scans completed by this sweep.
pub fn refresh_running(
    db: &mut MockDb,
    events: &ScanEvents,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<String> {
    let mut due = Vec::new();

    for scan in db
        .scans
        .iter_mut()
        .filter(|s| s.target_status == ScanStatus::Running)
    {
        if is_due(scan, now, window) {
            due.push(scan.id.clone());
        } else {
            let progress = progress_at(scan, now, window);
            if progress != scan.progress {
                tracing::debug!(scan_id = %scan.id, progress, "Scan progress updated");
            }
            scan.progress = progress;
        }
    }

    for scan_id in &due {
        let generated = match db.scan(scan_id) {
            Some(scan) => findings::generate(&scan.id, &scan.target_url, &scan.config.scope, now),
            None => continue,
        };
        complete_scan(db, events, scan_id, generated, None, now);
    }

    due
}

/// Transition a scan to `COMPLETED` with the given findings.
///
/// Stores the findings, computes the AI summary unless one is supplied, and
/// records the completion on the owning domain. Returns `None` when the scan
/// does not exist.
pub fn complete_scan(
    db: &mut MockDb,
    events: &ScanEvents,
    scan_id: &str,
    results: Vec<Finding>,
    ai_summary: Option<String>,
    now: DateTime<Utc>,
) -> Option<ScanRecord> {
    let finding_count = results.len();
    let scan = db.scan_mut(scan_id)?;

    scan.target_status = ScanStatus::Completed;
    scan.completed_at = Some(now);
    scan.last_run = Some(now);
    scan.progress = 100;
    scan.ai_summary =
        Some(ai_summary.unwrap_or_else(|| summary::build(&scan.target_url, &results)));

    let replace_summary = scan.summary.as_deref().map_or(true, |s| {
        s == PLACEHOLDER_SUMMARY || s.starts_with("Scan queued for")
    });
    if replace_summary {
        scan.summary = Some(if results.is_empty() {
            "Automated scan completed with no findings detected.".to_string()
        } else {
            "Automated scan completed with actionable findings.".to_string()
        });
    }

    let completed = scan.clone();
    db.results.insert(scan_id.to_string(), results);

    if let Some(domain) = db.domain_mut(&completed.domain_id) {
        domain.record_scan(now);
    }

    tracing::info!(
        scan_id = %completed.id,
        domain_id = %completed.domain_id,
        finding_count,
        "Scan completed"
    );
    events.publish(ScanEvent::Completed {
        scan_id: completed.id.clone(),
        domain_id: completed.domain_id.clone(),
        finding_count,
        completed_at: now,
    });

    Some(completed)
}
