//! Fixed-count concurrent HTTP GET load driver.
//!
//! A run sends `requests` GETs to one endpoint with at most `concurrency`
//! in flight, then reports success/failure counts, throughput and
//! nearest-rank p50/p95/p99 latencies.

pub mod client;
pub mod error;
pub mod executor;
pub mod models;
pub mod report;
pub mod telemetry;
pub mod utils;

pub use error::LoadError;
pub use executor::{run_load_test, run_load_test_to};
pub use models::config::RunConfig;
pub use models::metrics::RunSummary;
