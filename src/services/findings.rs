//! Canned vulnerability findings for simulated scans.
//!
//! Output is deterministic in count, type, severity and evidence for a given
//! scope and target URL; only ids and timestamps vary.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::db::random_suffix;
use crate::models::finding::{Evidence, Finding, ScanType, Severity};
use crate::models::scan::ScanScope;

const SQLI_REFERENCE: &str = "https://owasp.org/www-community/attacks/SQL_Injection";
const XSS_REFERENCE: &str = "https://owasp.org/www-community/attacks/xss/";
const REDIRECT_REFERENCE: &str = "https://owasp.org/www-community/attacks/Reverse_Tabnabbing";
const HEADERS_REFERENCE: &str = "https://owasp.org/www-project-secure-headers/";

const MISSING_HEADERS: [&str; 3] = [
    "Content-Security-Policy",
    "X-Frame-Options",
    "Strict-Transport-Security",
];

/// One finding per enabled scope flag, in SQLi, XSS, OpenRedirect, Headers order.
pub fn generate(
    scan_id: &str,
    target_url: &str,
    scope: &ScanScope,
    now: DateTime<Utc>,
) -> Vec<Finding> {
    let base = base_url(target_url);
    let mut findings = Vec::new();

    if scope.sqli {
        findings.push(Finding {
            id: finding_id(),
            task_id: scan_id.to_string(),
            scan_type: ScanType::Sqli,
            severity: Severity::High,
            summary: "SQL injection vector detected on login endpoint.".to_string(),
            raw_output: json!({ "payload": "admin' OR 1=1 --" }),
            evidence: Some(Evidence {
                request: Some(
                    "POST /login { username: \"admin' OR 1=1 --\", password: \"\" }".to_string(),
                ),
                response_snippet: Some("Login successful without a password provided.".to_string()),
                affected: vec![format!("{base}/login")],
            }),
            cwe: Some("CWE-89".to_string()),
            owasp: Some("A03:2021".to_string()),
            references: vec![SQLI_REFERENCE.to_string()],
            scanned_at: now,
            created_at: now,
        });
    }

    if scope.xss {
        findings.push(Finding {
            id: finding_id(),
            task_id: scan_id.to_string(),
            scan_type: ScanType::Xss,
            severity: Severity::Medium,
            summary: "Reflected XSS vulnerability detected in search parameter.".to_string(),
            raw_output: json!({ "payload": "<script>alert(1)</script>", "reflected": true }),
            evidence: Some(Evidence {
                request: Some("GET /search?q=<script>alert(1)</script>".to_string()),
                response_snippet: Some(
                    "<div>Results for <script>alert(1)</script></div>".to_string(),
                ),
                affected: vec![format!("{base}/search?q=")],
            }),
            cwe: Some("CWE-79".to_string()),
            owasp: Some("A03:2021".to_string()),
            references: vec![XSS_REFERENCE.to_string()],
            scanned_at: now,
            created_at: now,
        });
    }

    if scope.open_redirect {
        findings.push(Finding {
            id: finding_id(),
            task_id: scan_id.to_string(),
            scan_type: ScanType::OpenRedirect,
            severity: Severity::Low,
            summary: "Open redirect detected on the logout redirect parameter.".to_string(),
            raw_output: json!({ "parameter": "next", "value": "https://attacker.example" }),
            evidence: Some(Evidence {
                request: Some("GET /logout?next=https://attacker.example".to_string()),
                response_snippet: None,
                affected: vec![format!("{base}/logout")],
            }),
            cwe: Some("CWE-601".to_string()),
            owasp: Some("A01:2021".to_string()),
            references: vec![REDIRECT_REFERENCE.to_string()],
            scanned_at: now,
            created_at: now,
        });
    }

    if scope.headers {
        findings.push(headers_finding(finding_id(), scan_id, now));
    }

    findings
}

/// Findings of the unauthenticated basic scan: open redirect and headers only.
pub fn passive(scan_id: &str, target_url: &str, now: DateTime<Utc>) -> Vec<Finding> {
    let base = base_url(target_url);

    vec![
        Finding {
            id: format!("{scan_id}_open_redirect"),
            task_id: scan_id.to_string(),
            scan_type: ScanType::OpenRedirect,
            severity: Severity::Low,
            summary: "Potential open redirect discovered.".to_string(),
            raw_output: json!({ "parameter": "next", "value": "https://example.org" }),
            evidence: Some(Evidence {
                request: Some(format!("GET {base}/logout?next=https://example.org")),
                response_snippet: None,
                affected: vec![format!("{base}/logout")],
            }),
            cwe: Some("CWE-601".to_string()),
            owasp: Some("A01:2021".to_string()),
            references: vec![REDIRECT_REFERENCE.to_string()],
            scanned_at: now,
            created_at: now,
        },
        headers_finding(format!("{scan_id}_headers"), scan_id, now),
    ]
}

fn headers_finding(id: String, scan_id: &str, now: DateTime<Utc>) -> Finding {
    Finding {
        id,
        task_id: scan_id.to_string(),
        scan_type: ScanType::Headers,
        severity: Severity::Medium,
        summary: "Missing recommended security headers.".to_string(),
        raw_output: json!({ "missing": ["CSP", "X-Frame-Options", "HSTS"] }),
        evidence: Some(Evidence {
            request: None,
            response_snippet: None,
            affected: MISSING_HEADERS.iter().map(|h| h.to_string()).collect(),
        }),
        cwe: Some("CWE-693".to_string()),
        owasp: Some("A05:2021".to_string()),
        references: vec![HEADERS_REFERENCE.to_string()],
        scanned_at: now,
        created_at: now,
    }
}

fn finding_id() -> String {
    format!("sr_{}", random_suffix(8))
}

/// Target URL with a single trailing slash removed.
fn base_url(target_url: &str) -> &str {
    target_url.strip_suffix('/').unwrap_or(target_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(findings: &[Finding]) -> Vec<(ScanType, Severity)> {
        findings.iter().map(|f| (f.scan_type, f.severity)).collect()
    }

    #[test]
    fn full_scope_yields_four_findings_in_order() {
        let findings = generate("scan_a", "https://example.com", &ScanScope::default(), Utc::now());
        assert_eq!(
            kinds(&findings),
            vec![
                (ScanType::Sqli, Severity::High),
                (ScanType::Xss, Severity::Medium),
                (ScanType::OpenRedirect, Severity::Low),
                (ScanType::Headers, Severity::Medium),
            ]
        );
        assert!(findings.iter().all(|f| f.task_id == "scan_a"));
    }

    #[test]
    fn sqli_and_redirect_scope() {
        let scope = ScanScope {
            sqli: true,
            xss: false,
            open_redirect: true,
            headers: false,
        };
        let findings = generate("scan_b", "https://example.com", &scope, Utc::now());
        assert_eq!(
            kinds(&findings),
            vec![
                (ScanType::Sqli, Severity::High),
                (ScanType::OpenRedirect, Severity::Low)
            ]
        );
    }

    #[test]
    fn empty_scope_is_a_clean_scan() {
        let findings = generate("scan_c", "https://example.com", &ScanScope::NONE, Utc::now());
        assert!(findings.is_empty());
    }

    #[test]
    fn evidence_interpolates_target_without_trailing_slash() {
        let findings = generate("scan_d", "https://shop.test/", &ScanScope::default(), Utc::now());
        let sqli = findings[0].evidence.as_ref().unwrap();
        assert_eq!(sqli.affected, vec!["https://shop.test/login".to_string()]);
        let xss = findings[1].evidence.as_ref().unwrap();
        assert_eq!(xss.affected, vec!["https://shop.test/search?q=".to_string()]);
    }

    #[test]
    fn ids_are_fresh_per_call() {
        let now = Utc::now();
        let a = generate("s", "https://a.test", &ScanScope::default(), now);
        let b = generate("s", "https://a.test", &ScanScope::default(), now);
        assert!(a[0].id.starts_with("sr_"));
        assert_ne!(a[0].id, b[0].id);
        assert_eq!(a[0].evidence, b[0].evidence);
    }

    #[test]
    fn passive_findings_are_redirect_and_headers() {
        let findings = passive("passive_x", "https://site.test/", Utc::now());
        assert_eq!(
            kinds(&findings),
            vec![
                (ScanType::OpenRedirect, Severity::Low),
                (ScanType::Headers, Severity::Medium)
            ]
        );
        assert_eq!(findings[0].id, "passive_x_open_redirect");
        assert_eq!(findings[1].id, "passive_x_headers");
        assert_eq!(
            findings[0].evidence.as_ref().unwrap().request.as_deref(),
            Some("GET https://site.test/logout?next=https://example.org")
        );
    }
}
