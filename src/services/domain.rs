//! Domain registry: listing, DNS-token verification, rename and removal.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::MockDb;
use crate::errors::AppError;
use crate::models::domain::{Domain, VerificationStatus};
use crate::models::scan::ScanRecord;
use crate::services::events::ScanEvents;
use crate::services::{lifecycle, scan};

static DOMAIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("domain name regex is valid")
});

/// Trim a user-supplied hostname and check it is a plausible domain name.
pub fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Domain is required.".to_string()));
    }
    if !DOMAIN_NAME.is_match(name) {
        return Err(AppError::Validation(format!(
            "'{name}' is not a valid domain name."
        )));
    }
    Ok(name.to_string())
}

pub fn list(db: &MockDb) -> Vec<Domain> {
    db.domains.clone()
}

pub fn find_by_id(db: &MockDb, id: &str) -> Result<Domain, AppError> {
    db.domain(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Domain not found.".to_string()))
}

/// Check the TXT token for `raw_name` and advance its verification state.
///
/// A first successful check registers the domain as pending; the next one
/// promotes it to verified. Failed domains return to pending.
pub fn verify(
    db: &mut MockDb,
    raw_name: &str,
    token: &str,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<Domain, AppError> {
    let name = normalize_name(raw_name)?;

    if token != config.verify_token {
        return Err(AppError::InvalidToken);
    }

    if name
        .to_ascii_lowercase()
        .ends_with(&config.dns_failure_suffix.to_ascii_lowercase())
    {
        if let Some(existing) = db
            .domains
            .iter_mut()
            .find(|d| d.matches_name(&name) && !d.is_verified())
        {
            existing.mark_failed(AppError::DnsCheckFailed.to_string());
        }
        tracing::info!(domain = %name, "DNS verification failed");
        return Err(AppError::DnsCheckFailed);
    }

    if let Some(existing) = db.domains.iter_mut().find(|d| d.matches_name(&name)) {
        match existing.status() {
            VerificationStatus::Verified => return Err(AppError::AlreadyVerified),
            VerificationStatus::Pending => existing.mark_verified(now),
            VerificationStatus::Failed => existing.mark_pending(),
        }
        tracing::info!(
            domain_id = %existing.id,
            status = ?existing.status(),
            "Domain verification advanced"
        );
        return Ok(existing.clone());
    }

    let domain = Domain::new(
        Uuid::new_v4().to_string(),
        name,
        config.verify_token.clone(),
        now,
    );
    tracing::info!(domain_id = %domain.id, domain = %domain.domain_name, "Domain registered");
    db.domains.insert(0, domain.clone());
    Ok(domain)
}

/// Rename a domain. Renaming always resets verification to pending.
pub fn update(db: &mut MockDb, id: &str, raw_name: &str) -> Result<Domain, AppError> {
    let name = normalize_name(raw_name)?;

    if db.domain(id).is_none() {
        return Err(AppError::NotFound("Domain not found.".to_string()));
    }

    if db.domains.iter().any(|d| d.id != id && d.matches_name(&name)) {
        return Err(AppError::Conflict(
            "Another domain already uses this name.".to_string(),
        ));
    }

    let domain = db
        .domain_mut(id)
        .ok_or_else(|| AppError::NotFound("Domain not found.".to_string()))?;
    domain.domain_name = name.clone();
    domain.mark_pending();
    let updated = domain.clone();

    for scan in db.scans.iter_mut().filter(|s| s.domain_id == id) {
        scan.domain_name = name.clone();
    }

    tracing::info!(domain_id = %id, domain = %name, "Domain renamed, verification reset");
    Ok(updated)
}

/// Delete a domain and every scan and finding it owns.
pub fn remove(db: &mut MockDb, events: &ScanEvents, id: &str) -> Result<(), AppError> {
    let index = db
        .domains
        .iter()
        .position(|d| d.id == id)
        .ok_or_else(|| AppError::NotFound("Domain not found.".to_string()))?;
    db.domains.remove(index);

    let removed = scan::remove_all_for_domain(db, events, id);
    tracing::info!(domain_id = %id, scans_removed = removed, "Domain removed");
    Ok(())
}

/// Scans belonging to one domain, after advancing running scans.
pub fn scans_for_domain(
    db: &mut MockDb,
    events: &ScanEvents,
    id: &str,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<Vec<ScanRecord>, AppError> {
    if db.domain(id).is_none() {
        return Err(AppError::NotFound("Domain not found.".to_string()));
    }
    lifecycle::refresh_running(db, events, now, window);
    Ok(db
        .scans
        .iter()
        .filter(|s| s.domain_id == id)
        .cloned()
        .collect())
}
