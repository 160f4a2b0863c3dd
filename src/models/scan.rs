//! Scan task model, scan configuration, and scan request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::finding::Finding;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
    /// Declared for wire compatibility. Nothing transitions a scan here.
    Canceled,
}

impl ScanStatus {
    /// Completed, failed and canceled scans never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }
}

fn enabled() -> bool {
    true
}

/// Which checks a scan runs. Missing flags default to enabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanScope {
    #[serde(default = "enabled")]
    pub sqli: bool,
    #[serde(default = "enabled")]
    pub xss: bool,
    #[serde(default = "enabled")]
    pub open_redirect: bool,
    #[serde(default = "enabled")]
    pub headers: bool,
}

impl Default for ScanScope {
    fn default() -> Self {
        Self {
            sqli: true,
            xss: true,
            open_redirect: true,
            headers: true,
        }
    }
}

impl ScanScope {
    pub const NONE: ScanScope = ScanScope {
        sqli: false,
        xss: false,
        open_redirect: false,
        headers: false,
    };
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfiguration {
    #[serde(default)]
    pub scope: ScanScope,
    #[serde(default = "enabled")]
    pub auto_open_report: bool,
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            scope: ScanScope::default(),
            auto_open_report: true,
        }
    }
}

/// A scan as stored by the mock and returned by the scan endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub id: String,
    pub user_id: String,
    pub domain_id: String,
    #[serde(rename = "domainName")]
    pub domain_name: String,
    pub target_url: String,
    pub target_status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "lastRun", skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    /// Derived while running; 100 once completed, 0 once failed.
    pub progress: u8,
    pub config: ScanConfiguration,
    #[serde(rename = "aiSummary")]
    pub ai_summary: Option<String>,
}

/// Body of `POST /scans`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScan {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub domain_id: String,
    #[serde(default)]
    #[validate(url)]
    pub target_url: String,
    #[serde(default)]
    pub scope: ScanScope,
    #[serde(default = "enabled", rename = "autoOpenReport")]
    pub auto_open_report: bool,
}

/// Response of `GET /scans/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanDetail {
    pub scan: ScanRecord,
    pub results: Vec<Finding>,
    #[serde(rename = "aiSummary")]
    pub ai_summary: Option<String>,
}

/// Body of `POST /scans/{id}/complete`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteScan {
    #[serde(default)]
    pub results: Vec<Finding>,
    #[serde(default, rename = "aiSummary")]
    pub ai_summary: Option<String>,
}

/// Response of `POST /scans/{id}/complete`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedScan {
    pub scan: ScanRecord,
    pub results: Vec<Finding>,
}

/// Body of `POST /scans/passive`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassiveScanRequest {
    #[serde(default)]
    #[validate(url)]
    pub target_url: String,
}

/// Response of `POST /scans/passive`.
#[derive(Debug, Clone, Serialize)]
pub struct PassiveScanResponse {
    #[serde(rename = "scanId")]
    pub scan_id: String,
    pub summary: String,
    pub results: Vec<Finding>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ScanStatus::Running).unwrap(),
            "\"RUNNING\""
        );
        assert_eq!(
            serde_json::to_string(&ScanStatus::Canceled).unwrap(),
            "\"CANCELED\""
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(ScanStatus::Completed.is_terminal());
        assert!(ScanStatus::Failed.is_terminal());
        assert!(ScanStatus::Canceled.is_terminal());
        assert!(!ScanStatus::Running.is_terminal());
        assert!(!ScanStatus::Pending.is_terminal());
    }

    #[test]
    fn partial_scope_merges_over_defaults() {
        let scope: ScanScope = serde_json::from_str(r#"{"sqli": false}"#).unwrap();
        assert!(!scope.sqli);
        assert!(scope.xss && scope.open_redirect && scope.headers);
    }

    #[test]
    fn create_scan_defaults() {
        let body: CreateScan = serde_json::from_str(
            r#"{"domain_id": "dom_1", "target_url": "https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(body.scope, ScanScope::default());
        assert!(body.auto_open_report);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn create_scan_rejects_non_url_target() {
        let body: CreateScan = serde_json::from_str(
            r#"{"domain_id": "dom_1", "target_url": "not a url", "autoOpenReport": false}"#,
        )
        .unwrap();
        assert!(!body.auto_open_report);
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_scan_missing_fields_fail_validation() {
        let body: CreateScan = serde_json::from_str("{}").unwrap();
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("domain_id"));
        assert!(errors.field_errors().contains_key("target_url"));
    }

    #[test]
    fn configuration_uses_camel_case() {
        let json = serde_json::to_value(ScanConfiguration::default()).unwrap();
        assert_eq!(json["autoOpenReport"], true);
        assert_eq!(json["scope"]["openRedirect"], true);
    }
}
