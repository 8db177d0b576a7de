use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LoadError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8900";
pub const DEFAULT_PATH: &str = "/search";
pub const DEFAULT_QUERY: &str = "migration schema";
pub const DEFAULT_REQUESTS: usize = 200;
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Everything except letters, digits and `_.-~/` is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Parameters of a single run. Every field may be omitted from a JSON
/// config file, in which case the built-in default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub base_url: String,
    pub path: String,
    pub query: String,
    pub requests: usize,
    pub concurrency: usize,
    pub timeout_ms: u64,

    /// Where to write the JSON summary, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_PATH.to_string(),
            query: DEFAULT_QUERY.to_string(),
            requests: DEFAULT_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            report_path: None,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LoadError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.concurrency == 0 {
            return Err(LoadError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(LoadError::InvalidConfig(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `<base_url><path>?q=<query>`, with the query percent-encoded and
    /// spaces written as `%20` rather than `+`. Slashes and `~` are left
    /// as they are.
    pub fn target_url(&self) -> Result<Url, LoadError> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(&self.path);
        let encoded = encode_query_value(&self.query);
        url.set_query(Some(&format!("q={}", encoded)));
        Ok(url)
    }
}

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
