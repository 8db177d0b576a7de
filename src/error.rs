use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run before or after dispatch.
///
/// Per-request failures never show up here; they are recorded on the
/// [`RequestOutcome`](crate::models::outcome::RequestOutcome) instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid target url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid request uri: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("Failed to write run output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
