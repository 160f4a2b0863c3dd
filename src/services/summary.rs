//! Human-readable synopsis of a scan's findings.
//!
//! The UI renders severity groups in the order produced here, so groups are
//! always emitted critical, high, medium, low.

use std::collections::HashMap;

use crate::models::finding::{Finding, Severity};

pub fn build(target_url: &str, findings: &[Finding]) -> String {
    if findings.is_empty() {
        return format!("The scan of {target_url} completed with no vulnerabilities discovered.");
    }

    let mut counts: HashMap<Severity, usize> = HashMap::new();
    for finding in findings {
        *counts.entry(finding.severity).or_default() += 1;
    }

    let parts: Vec<String> = Severity::DESCENDING
        .iter()
        .filter_map(|severity| {
            counts
                .get(severity)
                .map(|count| format!("{count} {}", severity.as_str()))
        })
        .collect();

    format!(
        "The scan of {target_url} surfaced {} findings ({}). Prioritise the highest severity \
         issues first and schedule a follow-up scan after remediation.",
        findings.len(),
        parts.join(", ")
    )
}
