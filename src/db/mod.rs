//! In-memory store standing in for the scanner backend's database.

pub mod seed;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use tokio::sync::Mutex;

use crate::models::domain::Domain;
use crate::models::finding::Finding;
use crate::models::scan::ScanRecord;

/// Shared handle to the store. One coarse lock guards every table because
/// scan reads also write (lazy completion).
pub type Db = Arc<Mutex<MockDb>>;

/// All mock tables. Newest records sit at the front of each list.
#[derive(Debug, Default)]
pub struct MockDb {
    pub domains: Vec<Domain>,
    pub scans: Vec<ScanRecord>,
    /// Findings keyed by scan id.
    pub results: HashMap<String, Vec<Finding>>,
}

impl MockDb {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo dataset.
    pub fn seeded(verify_token: &str, now: DateTime<Utc>) -> Self {
        let mut db = Self::empty();
        seed::populate(&mut db, verify_token, now);
        db
    }

    /// Drop every record and reload the demo dataset.
    pub fn reset(&mut self, verify_token: &str, now: DateTime<Utc>) {
        *self = Self::seeded(verify_token, now);
    }

    pub fn domain(&self, id: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn domain_mut(&mut self, id: &str) -> Option<&mut Domain> {
        self.domains.iter_mut().find(|d| d.id == id)
    }

    pub fn domain_by_name(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.matches_name(name))
    }

    pub fn scan(&self, id: &str) -> Option<&ScanRecord> {
        self.scans.iter().find(|s| s.id == id)
    }

    pub fn scan_mut(&mut self, id: &str) -> Option<&mut ScanRecord> {
        self.scans.iter_mut().find(|s| s.id == id)
    }

    pub fn results_for(&self, scan_id: &str) -> Vec<Finding> {
        self.results.get(scan_id).cloned().unwrap_or_default()
    }
}

/// Wrap a store for sharing across handlers.
pub fn create_store(db: MockDb) -> Db {
    Arc::new(Mutex::new(db))
}

/// Lowercase alphanumeric suffix for generated ids (`scan_k3f9a1`).
pub fn random_suffix(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}
