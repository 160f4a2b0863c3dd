//! Scan store: creation, lookup, removal, external completion and passive scans.

use chrono::{DateTime, Duration, Utc};
use validator::Validate;

use crate::db::{random_suffix, MockDb};
use crate::errors::AppError;
use crate::models::finding::Finding;
use crate::models::scan::{
    CompletedScan, CreateScan, PassiveScanResponse, ScanConfiguration, ScanDetail, ScanRecord,
    ScanStatus,
};
use crate::models::MOCK_USER_ID;
use crate::services::events::{ScanEvent, ScanEvents};
use crate::services::{findings, lifecycle};

/// Progress reported by a freshly created scan.
pub const INITIAL_PROGRESS: u8 = 20;

/// Reported duration of a passive scan.
const PASSIVE_SCAN_MS: i64 = 750;

/// Start a scan against a verified domain.
pub fn create(
    db: &mut MockDb,
    events: &ScanEvents,
    body: CreateScan,
    now: DateTime<Utc>,
) -> Result<ScanRecord, AppError> {
    body.validate()?;

    let domain = db.domain(&body.domain_id).ok_or(AppError::DomainNotFound)?;
    if !domain.is_verified() {
        return Err(AppError::DomainNotVerified);
    }

    let scan = ScanRecord {
        id: format!("scan_{}", random_suffix(6)),
        user_id: MOCK_USER_ID.to_string(),
        domain_id: domain.id.clone(),
        domain_name: domain.domain_name.clone(),
        target_url: body.target_url,
        target_status: ScanStatus::Running,
        summary: Some(format!("Scan queued for {}", domain.domain_name)),
        created_at: now,
        completed_at: None,
        last_run: None,
        progress: INITIAL_PROGRESS,
        config: ScanConfiguration {
            scope: body.scope,
            auto_open_report: body.auto_open_report,
        },
        ai_summary: None,
    };

    tracing::info!(
        scan_id = %scan.id,
        domain_id = %scan.domain_id,
        target_url = %scan.target_url,
        "Scan started"
    );
    db.scans.insert(0, scan.clone());
    events.publish(ScanEvent::Created {
        scan_id: scan.id.clone(),
        domain_id: scan.domain_id.clone(),
    });
    Ok(scan)
}

/// All scans, newest first, after advancing running scans.
pub fn list(
    db: &mut MockDb,
    events: &ScanEvents,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<ScanRecord> {
    lifecycle::refresh_running(db, events, now, window);
    db.scans.clone()
}

/// One scan with its findings, after advancing running scans.
pub fn find_by_id(
    db: &mut MockDb,
    events: &ScanEvents,
    id: &str,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<ScanDetail, AppError> {
    lifecycle::refresh_running(db, events, now, window);
    let scan = db
        .scan(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Scan not found.".to_string()))?;

    Ok(ScanDetail {
        results: db.results_for(id),
        ai_summary: scan.ai_summary.clone(),
        scan,
    })
}

/// Delete one scan and its findings.
pub fn remove(db: &mut MockDb, events: &ScanEvents, id: &str) -> Result<(), AppError> {
    let index = db
        .scans
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound("Scan not found.".to_string()))?;
    db.scans.remove(index);
    db.results.remove(id);

    tracing::info!(scan_id = %id, "Scan removed");
    events.publish(ScanEvent::Removed {
        scan_id: id.to_string(),
    });
    Ok(())
}

/// Delete every scan of a domain. Returns how many were removed.
pub fn remove_all_for_domain(db: &mut MockDb, events: &ScanEvents, domain_id: &str) -> usize {
    let (removed, kept): (Vec<ScanRecord>, Vec<ScanRecord>) = std::mem::take(&mut db.scans)
        .into_iter()
        .partition(|s| s.domain_id == domain_id);
    db.scans = kept;

    for scan in &removed {
        db.results.remove(&scan.id);
        events.publish(ScanEvent::Removed {
            scan_id: scan.id.clone(),
        });
    }

    tracing::info!(domain_id = %domain_id, count = removed.len(), "Domain scans removed");
    removed.len()
}

/// Attach externally produced findings to a scan that has not finished yet.
pub fn complete(
    db: &mut MockDb,
    events: &ScanEvents,
    id: &str,
    results: Vec<Finding>,
    ai_summary: Option<String>,
    now: DateTime<Utc>,
) -> Result<CompletedScan, AppError> {
    let status = db
        .scan(id)
        .map(|s| s.target_status)
        .ok_or_else(|| AppError::NotFound("Scan not found.".to_string()))?;
    if status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Scan {id} has already finished."
        )));
    }

    let results: Vec<Finding> = results
        .into_iter()
        .map(|mut finding| {
            finding.task_id = id.to_string();
            finding
        })
        .collect();

    let scan = lifecycle::complete_scan(db, events, id, results.clone(), ai_summary, now)
        .ok_or_else(|| AppError::NotFound("Scan not found.".to_string()))?;
    Ok(CompletedScan { scan, results })
}

/// Synchronous basic scan; nothing is stored.
pub fn run_passive(target_url: &str, now: DateTime<Utc>) -> PassiveScanResponse {
    let scan_id = format!("passive_{}", random_suffix(6));
    let results = findings::passive(&scan_id, target_url, now);

    let summary = match results.len() {
        0 => "Basic scan completed with no issues detected.".to_string(),
        1 => "Basic scan completed with 1 potential issue.".to_string(),
        n => format!("Basic scan completed with {n} potential issues."),
    };

    tracing::info!(scan_id = %scan_id, target_url = %target_url, "Passive scan finished");
    PassiveScanResponse {
        scan_id,
        summary,
        results,
        started_at: now,
        completed_at: now + Duration::milliseconds(PASSIVE_SCAN_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::config::AppConfig;
    use crate::models::scan::ScanScope;
    use crate::services::domain;

    fn setup() -> (MockDb, ScanEvents, AppConfig) {
        let config = AppConfig::default();
        (
            MockDb::seeded(&config.verify_token, Utc::now()),
            ScanEvents::default(),
            config,
        )
    }

    fn request(domain_id: &str, scope: ScanScope) -> CreateScan {
        CreateScan {
            domain_id: domain_id.to_string(),
            target_url: "https://example.com".to_string(),
            scope,
            auto_open_report: true,
        }
    }

    #[test]
    fn create_starts_running_at_twenty() {
        let (mut db, events, _) = setup();
        let scan = create(&mut db, &events, request("dom_1", ScanScope::default()), Utc::now())
            .unwrap();
        assert_eq!(scan.target_status, ScanStatus::Running);
        assert_eq!(scan.progress, INITIAL_PROGRESS);
        assert!(scan.id.starts_with("scan_"));
        assert_eq!(scan.domain_name, "example.com");
        assert_eq!(db.scans[0].id, scan.id);
    }

    #[test]
    fn create_unknown_domain() {
        let (mut db, events, _) = setup();
        let err = create(&mut db, &events, request("dom_x", ScanScope::default()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::DomainNotFound));
    }

    #[test]
    fn create_on_unverified_domain_creates_nothing() {
        let (mut db, events, _) = setup();
        let before = db.scans.len();
        let err = create(&mut db, &events, request("dom_3", ScanScope::default()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::DomainNotVerified));
        assert_eq!(db.scans.len(), before);
    }

    #[test]
    fn create_validates_target_url() {
        let (mut db, events, _) = setup();
        let mut body = request("dom_1", ScanScope::default());
        body.target_url = "example".into();
        let err = create(&mut db, &events, body, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn find_by_id_unknown() {
        let (mut db, events, config) = setup();
        let err = find_by_id(&mut db, &events, "nope", Utc::now(), config.completion_window())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn seeded_running_scans_complete_on_first_list() {
        let (mut db, events, config) = setup();
        let scans = list(&mut db, &events, Utc::now(), config.completion_window());
        for id in ["scan_3", "scan_6"] {
            let scan = scans.iter().find(|s| s.id == id).unwrap();
            assert_eq!(scan.target_status, ScanStatus::Completed);
        }
        let pending = scans.iter().find(|s| s.id == "scan_7").unwrap();
        assert_eq!(pending.target_status, ScanStatus::Pending);
        assert_eq!(db.domain("dom_1").unwrap().scan_count, 4);
    }

    #[test]
    fn remove_deletes_scan_and_findings() {
        let (mut db, events, _) = setup();
        remove(&mut db, &events, "scan_1").unwrap();
        assert!(db.scan("scan_1").is_none());
        assert!(!db.results.contains_key("scan_1"));
        assert!(remove(&mut db, &events, "scan_1").unwrap_err().is_not_found());
    }

    #[test]
    fn remove_all_for_domain_counts() {
        let (mut db, events, _) = setup();
        assert_eq!(remove_all_for_domain(&mut db, &events, "dom_2"), 2);
        assert_eq!(remove_all_for_domain(&mut db, &events, "dom_2"), 0);
        assert_eq!(db.scans.len(), 5);
    }

    #[test]
    fn external_completion() {
        let (mut db, events, _) = setup();
        let now = Utc::now();
        let scan = create(&mut db, &events, request("dom_1", ScanScope::default()), now).unwrap();
        let results = findings::generate("other", &scan.target_url, &ScanScope::NONE, now);

        let done = complete(&mut db, &events, &scan.id, results, None, now).unwrap();
        assert_eq!(done.scan.target_status, ScanStatus::Completed);
        assert!(done.results.is_empty());

        let err = complete(&mut db, &events, &scan.id, Vec::new(), None, now).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = complete(&mut db, &events, "missing", Vec::new(), None, now).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn external_completion_rebinds_task_id() {
        let (mut db, events, _) = setup();
        let now = Utc::now();
        let scan = create(&mut db, &events, request("dom_1", ScanScope::default()), now).unwrap();
        let results = findings::generate("elsewhere", &scan.target_url, &ScanScope::default(), now);
        let done = complete(&mut db, &events, &scan.id, results, None, now).unwrap();
        assert!(done.results.iter().all(|f| f.task_id == scan.id));
    }

    #[test]
    fn passive_scan_response() {
        let now = Utc::now();
        let response = run_passive("https://site.test", now);
        assert!(response.scan_id.starts_with("passive_"));
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.summary, "Basic scan completed with 2 potential issues.");
        assert_eq!(response.completed_at - response.started_at, Duration::milliseconds(750));
    }

    #[test]
    fn end_to_end_verified_domain_scan() {
        let (mut db, events, config) = setup();
        let window = config.completion_window();
        let clock = ManualClock::new(Utc::now());
        let token = config.verify_token.clone();

        db.domains.retain(|d| d.domain_name != "example.com");
        db.scans.retain(|s| s.domain_id != "dom_1");
        domain::verify(&mut db, "example.com", &token, &config, clock.now()).unwrap();
        let verified = domain::verify(&mut db, "example.com", &token, &config, clock.now()).unwrap();
        assert!(verified.is_verified());

        let scan = create(&mut db, &events, request(&verified.id, ScanScope::default()), clock.now())
            .unwrap();

        let detail = find_by_id(&mut db, &events, &scan.id, clock.now(), window).unwrap();
        assert_eq!(detail.scan.target_status, ScanStatus::Running);
        assert!(detail.scan.progress < 100);
        assert!(detail.results.is_empty());

        clock.advance(window);
        let detail = find_by_id(&mut db, &events, &scan.id, clock.now(), window).unwrap();
        assert_eq!(detail.scan.target_status, ScanStatus::Completed);
        assert_eq!(detail.results.len(), 4);
        assert!(detail.ai_summary.is_some());

        let domain = db.domain(&verified.id).unwrap();
        assert_eq!(domain.scan_count, verified.scan_count + 1);
        assert_eq!(domain.last_scan, detail.scan.completed_at);
    }
}
