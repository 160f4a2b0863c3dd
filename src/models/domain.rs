//! Domain registry model with the DNS verification state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed,
}

/// A scan target owned by the (single) mock user.
///
/// Status changes go through [`Domain::mark_verified`], [`Domain::mark_pending`]
/// and [`Domain::mark_failed`] so that `verified_at` and `verification_error`
/// never disagree with `verification_status`.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "DomainView")]
pub struct Domain {
    pub id: String,
    pub user_id: String,
    pub domain_name: String,
    pub verification_token: String,
    pub created_at: DateTime<Utc>,
    pub scan_count: u32,
    pub last_scan: Option<DateTime<Utc>>,
    verification_status: VerificationStatus,
    verification_error: Option<String>,
    verified_at: Option<DateTime<Utc>>,
}

impl Domain {
    pub fn new(
        id: String,
        domain_name: String,
        verification_token: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: super::MOCK_USER_ID.to_string(),
            domain_name,
            verification_token,
            created_at: now,
            scan_count: 0,
            last_scan: None,
            verification_status: VerificationStatus::Pending,
            verification_error: None,
            verified_at: None,
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.verification_status
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    pub fn verification_error(&self) -> Option<&str> {
        self.verification_error.as_deref()
    }

    /// Case-insensitive comparison against a user-supplied hostname.
    pub fn matches_name(&self, name: &str) -> bool {
        self.domain_name.eq_ignore_ascii_case(name.trim())
    }

    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verification_status = VerificationStatus::Verified;
        self.verification_error = None;
        self.verified_at = Some(now);
    }

    pub fn mark_pending(&mut self) {
        self.verification_status = VerificationStatus::Pending;
        self.verification_error = None;
        self.verified_at = None;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.verification_status = VerificationStatus::Failed;
        self.verification_error = Some(error.into());
        self.verified_at = None;
    }

    /// Record a completed scan against this domain's aggregate stats.
    pub fn record_scan(&mut self, completed_at: DateTime<Utc>) {
        self.scan_count += 1;
        self.last_scan = Some(completed_at);
    }
}

/// Wire shape of a domain, with `isVerified` derived from the status.
#[derive(Debug, Serialize)]
struct DomainView {
    id: String,
    user_id: String,
    domain_name: String,
    #[serde(rename = "isVerified")]
    is_verified: bool,
    verification_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    verification_status: VerificationStatus,
    verification_error: Option<String>,
    #[serde(rename = "scanCount")]
    scan_count: u32,
    #[serde(rename = "lastScan", skip_serializing_if = "Option::is_none")]
    last_scan: Option<DateTime<Utc>>,
}

impl From<Domain> for DomainView {
    fn from(domain: Domain) -> Self {
        Self {
            is_verified: domain.is_verified(),
            id: domain.id,
            user_id: domain.user_id,
            domain_name: domain.domain_name,
            verification_token: domain.verification_token,
            verified_at: domain.verified_at,
            created_at: domain.created_at,
            verification_status: domain.verification_status,
            verification_error: domain.verification_error,
            scan_count: domain.scan_count,
            last_scan: domain.last_scan,
        }
    }
}

/// Body of `POST /domains/verify`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyDomain {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub token: String,
}

/// Body of `PATCH /domains/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDomain {
    #[serde(default)]
    pub domain: String,
}
