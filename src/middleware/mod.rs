//! Request middleware.

pub mod latency;
