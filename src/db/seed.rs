//! Demo dataset loaded at startup and on `POST /api/mock/reset`.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::MockDb;
use crate::models::domain::Domain;
use crate::models::scan::{ScanConfiguration, ScanRecord, ScanScope, ScanStatus};
use crate::models::MOCK_USER_ID;
use crate::services::findings;

/// Fill `db` with three domains, seven scans and the findings of `scan_1`.
pub fn populate(db: &mut MockDb, verify_token: &str, now: DateTime<Utc>) {
    db.domains = seed_domains(verify_token, now);
    db.scans = seed_scans(now);

    if let Some(first) = db.scans.first() {
        let results = findings::generate(&first.id, &first.target_url, &first.config.scope, now);
        db.results.insert(first.id.clone(), results);
    }
}

fn seed_domains(verify_token: &str, now: DateTime<Utc>) -> Vec<Domain> {
    let domain = |id: &str, name: &str, verified: bool, scan_count: u32| {
        let mut d = Domain::new(id.to_string(), name.to_string(), verify_token.to_string(), now);
        if verified {
            d.mark_verified(now);
            d.last_scan = Some(now);
        }
        d.scan_count = scan_count;
        d
    };

    vec![
        domain("dom_1", "example.com", true, 3),
        domain("dom_2", "test.dev", true, 2),
        domain("dom_3", "staging.myapp.io", false, 2),
    ]
}

struct SeedScan {
    id: &'static str,
    domain_id: &'static str,
    domain_name: &'static str,
    target_url: &'static str,
    status: ScanStatus,
    summary: &'static str,
    started_ago: Duration,
    completed_ago: Option<Duration>,
    progress: Option<u8>,
    scope: ScanScope,
}

fn scope(sqli: bool, xss: bool, open_redirect: bool, headers: bool) -> ScanScope {
    ScanScope {
        sqli,
        xss,
        open_redirect,
        headers,
    }
}

fn seed_scans(now: DateTime<Utc>) -> Vec<ScanRecord> {
    let seeds = [
        SeedScan {
            id: "scan_1",
            domain_id: "dom_1",
            domain_name: "example.com",
            target_url: "https://example.com",
            status: ScanStatus::Completed,
            summary: "Full surface scan with no critical issues detected.",
            started_ago: Duration::hours(24),
            completed_ago: Some(Duration::hours(23)),
            progress: None,
            scope: ScanScope::default(),
        },
        SeedScan {
            id: "scan_2",
            domain_id: "dom_1",
            domain_name: "example.com",
            target_url: "https://example.com/login",
            status: ScanStatus::Completed,
            summary: "Authentication journey scan flagged elevated response times on login.",
            started_ago: Duration::hours(12),
            completed_ago: Some(Duration::hours(11)),
            progress: None,
            scope: scope(true, true, false, false),
        },
        SeedScan {
            id: "scan_3",
            domain_id: "dom_1",
            domain_name: "example.com",
            target_url: "https://example.com/billing",
            status: ScanStatus::Running,
            summary: "Checkout workflow scan in progress.",
            started_ago: Duration::minutes(20),
            completed_ago: None,
            progress: Some(45),
            scope: ScanScope::default(),
        },
        SeedScan {
            id: "scan_4",
            domain_id: "dom_2",
            domain_name: "test.dev",
            target_url: "https://test.dev",
            status: ScanStatus::Completed,
            summary: "Baseline scan highlighted missing security headers.",
            started_ago: Duration::hours(36),
            completed_ago: Some(Duration::hours(35)),
            progress: None,
            scope: scope(false, true, true, true),
        },
        SeedScan {
            id: "scan_5",
            domain_id: "dom_2",
            domain_name: "test.dev",
            target_url: "https://test.dev/api",
            status: ScanStatus::Failed,
            summary: "API surface scan ended after authentication timeouts. Needs review.",
            started_ago: Duration::hours(5),
            completed_ago: Some(Duration::minutes(270)),
            progress: None,
            scope: scope(true, false, false, false),
        },
        SeedScan {
            id: "scan_6",
            domain_id: "dom_3",
            domain_name: "staging.myapp.io",
            target_url: "https://staging.myapp.io",
            status: ScanStatus::Running,
            summary: "Staging smoke test running against latest release.",
            started_ago: Duration::minutes(10),
            completed_ago: None,
            progress: Some(30),
            scope: ScanScope::default(),
        },
        SeedScan {
            id: "scan_7",
            domain_id: "dom_3",
            domain_name: "staging.myapp.io",
            target_url: "https://staging.myapp.io/admin",
            status: ScanStatus::Pending,
            summary: "Queued admin portal scan awaiting resources.",
            started_ago: Duration::minutes(5),
            completed_ago: None,
            progress: None,
            scope: ScanScope::default(),
        },
    ];

    seeds.into_iter().map(|seed| build(seed, now)).collect()
}

fn build(seed: SeedScan, now: DateTime<Utc>) -> ScanRecord {
    let completed_at = match seed.status {
        ScanStatus::Completed | ScanStatus::Failed => {
            Some(now - seed.completed_ago.unwrap_or_else(Duration::zero))
        }
        _ => None,
    };
    let progress = match seed.status {
        ScanStatus::Completed => 100,
        ScanStatus::Failed => 0,
        _ => seed
            .progress
            .unwrap_or_else(|| rand::rng().random_range(15..=35)),
    };
    let last_run = if seed.status == ScanStatus::Completed {
        completed_at
    } else {
        None
    };

    ScanRecord {
        id: seed.id.to_string(),
        user_id: MOCK_USER_ID.to_string(),
        domain_id: seed.domain_id.to_string(),
        domain_name: seed.domain_name.to_string(),
        target_url: seed.target_url.to_string(),
        target_status: seed.status,
        summary: Some(seed.summary.to_string()),
        created_at: now - seed.started_ago,
        completed_at,
        last_run,
        progress,
        config: ScanConfiguration {
            scope: seed.scope,
            auto_open_report: true,
        },
        ai_summary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_respects_progress_invariants() {
        let db = MockDb::seeded("tok", Utc::now());
        for scan in &db.scans {
            match scan.target_status {
                ScanStatus::Completed => assert_eq!(scan.progress, 100),
                ScanStatus::Failed => assert_eq!(scan.progress, 0),
                _ => assert!(scan.progress > 0 && scan.progress < 100),
            }
        }
    }

    #[test]
    fn seed_domain_verification_states() {
        let db = MockDb::seeded("tok", Utc::now());
        let verified: Vec<_> = db
            .domains
            .iter()
            .filter(|d| d.is_verified())
            .map(|d| d.domain_name.as_str())
            .collect();
        assert_eq!(verified, vec!["example.com", "test.dev"]);
        assert!(db.domains.iter().all(|d| d.verified_at().is_some() == d.is_verified()));
    }

    #[test]
    fn first_scan_has_full_findings() {
        let db = MockDb::seeded("tok", Utc::now());
        assert_eq!(db.results_for("scan_1").len(), 4);
    }
}
