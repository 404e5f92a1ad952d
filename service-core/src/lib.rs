//! service-core: shared infrastructure for the DriftMind web services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

