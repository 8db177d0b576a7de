use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::LoadError;
use crate::models::config::RunConfig;
use crate::models::metrics::RunSummary;
use crate::models::outcome::RequestOutcome;

/// Nearest-rank percentile over an ascending slice: the element at
/// `floor(p * (n - 1))`. No interpolation.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let last = sorted.len() - 1;
    let index = (p.clamp(0.0, 1.0) * last as f64).floor() as usize;
    sorted.get(index.min(last)).copied()
}

pub fn config_lines(url: &str, config: &RunConfig) -> [String; 2] {
    [
        format!("URL: {}", url),
        format!(
            "REQUESTS={} CONCURRENCY={}",
            config.requests, config.concurrency
        ),
    ]
}

pub fn failure_line(outcome: &RequestOutcome) -> String {
    let status = outcome
        .status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "None".to_string());
    format!(
        "[FAIL] #{} status={} time={:.3}s err={}",
        outcome.index,
        status,
        outcome.elapsed_secs(),
        outcome.error.as_deref().unwrap_or("None")
    )
}

/// Final summary. With no successes only the counts and wall time are
/// reported. `rps=n/a` means the run took no measurable time.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    match summary.percentiles {
        Some(p) if summary.successful_requests > 0 => {
            let rps = summary
                .throughput
                .map(|rps| format!("{:.1}", rps))
                .unwrap_or_else(|| "n/a".to_string());
            vec![
                format!(
                    "OK={} FAIL={} total={:.2}s rps={}",
                    summary.successful_requests, summary.failed_requests, summary.total_secs, rps
                ),
                format!("p50={:.3}s p95={:.3}s p99={:.3}s", p.p50, p.p95, p.p99),
            ]
        }
        _ => vec![format!(
            "OK={} FAIL={} total={:.2}s",
            summary.successful_requests, summary.failed_requests, summary.total_secs
        )],
    }
}

pub fn write_json(summary: &RunSummary, path: &Path) -> Result<(), LoadError> {
    let to_err = |source: io::Error| LoadError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary).map_err(|e| to_err(e.into()))?;
    writer.flush().map_err(to_err)
}
