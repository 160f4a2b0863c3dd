//! Business logic services.

pub mod domain;
pub mod events;
pub mod findings;
pub mod lifecycle;
pub mod scan;
pub mod summary;
pub mod sweeper;
