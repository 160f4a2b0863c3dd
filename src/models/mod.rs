//! Records and DTOs for domains, scans and findings.

pub mod domain;
pub mod finding;
pub mod scan;

/// Owner of every record in the mock; authentication is out of scope.
pub const MOCK_USER_ID: &str = "usr_123";
