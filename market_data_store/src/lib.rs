#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod frame;
pub mod gaps;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod providers;
pub mod ratelimit;
pub mod schema;
pub mod service;
pub mod session;
pub mod store;
pub mod validate;
