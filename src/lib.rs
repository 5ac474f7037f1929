pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;

// Layered boundaries for application ports and infrastructure
pub mod app;
pub mod infra;
