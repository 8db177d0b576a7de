use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::models::outcome::RequestOutcome;
use crate::report::percentile;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// `None` when there is nothing to rank.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(Self {
            p50: percentile(sorted, 0.50)?,
            p95: percentile(sorted, 0.95)?,
            p99: percentile(sorted, 0.99)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HostInfo {
    pub cpu_cores: u64,
    pub total_memory: u64,
    pub available_memory: u64,
}

/// Aggregate of a finished run. Latencies are in seconds and cover
/// successful requests only.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub target_url: String,
    pub requests: usize,
    pub concurrency: usize,
    pub timestamp: String,

    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_secs: f64,

    pub latencies: Vec<f64>,
    pub percentiles: Option<Percentiles>,
    pub throughput: Option<f64>,
    pub fastest_response: Option<f64>,
    pub slowest_response: Option<f64>,

    pub status_counts: BTreeMap<String, u64>,
    pub host: HostInfo,

    /// Completion order.
    #[serde(skip)]
    pub outcomes: Vec<RequestOutcome>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: Vec<RequestOutcome>, total: Duration) -> Self {
        let mut latencies = Vec::new();
        let mut status_counts = BTreeMap::new();
        let mut failed_requests = 0;

        for outcome in &outcomes {
            *status_counts.entry(outcome.status_key()).or_insert(0) += 1;
            if outcome.is_success() {
                latencies.push(outcome.elapsed_secs());
            } else {
                failed_requests += 1;
            }
        }

        latencies.sort_by(|a, b| a.total_cmp(b));

        let successful_requests = latencies.len();
        let total_secs = total.as_secs_f64();
        let throughput = if successful_requests > 0 && total_secs > 0.0 {
            Some(successful_requests as f64 / total_secs)
        } else {
            None
        };

        Self {
            target_url: String::new(),
            requests: outcomes.len(),
            concurrency: 0,
            timestamp: String::new(),
            successful_requests,
            failed_requests,
            total_secs,
            percentiles: Percentiles::from_sorted(&latencies),
            throughput,
            fastest_response: latencies.first().copied(),
            slowest_response: latencies.last().copied(),
            latencies,
            status_counts,
            host: HostInfo::default(),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(index: usize, ms: u64) -> RequestOutcome {
        RequestOutcome::response(index, 200, Duration::from_millis(ms))
    }

    #[test]
    fn counts_add_up_to_outcomes() {
        let outcomes = vec![
            ok(0, 30),
            RequestOutcome::response(1, 500, Duration::from_millis(10)),
            ok(2, 10),
            RequestOutcome::failure(3, Duration::from_millis(50), "timed out"),
            ok(4, 20),
        ];
        let summary = RunSummary::from_outcomes(outcomes, Duration::from_secs(1));

        assert_eq!(summary.successful_requests, 3);
        assert_eq!(summary.failed_requests, 2);
        assert_eq!(
            summary.successful_requests + summary.failed_requests,
            summary.requests
        );
        assert_eq!(summary.latencies, vec![0.010, 0.020, 0.030]);
        assert_eq!(summary.fastest_response, Some(0.010));
        assert_eq!(summary.slowest_response, Some(0.030));
        assert_eq!(summary.throughput, Some(3.0));
        assert_eq!(summary.status_counts.get("200"), Some(&3));
        assert_eq!(summary.status_counts.get("500"), Some(&1));
        assert_eq!(summary.status_counts.get("ERROR"), Some(&1));
    }

    #[test]
    fn no_successes_leaves_stats_empty() {
        let outcomes = vec![
            RequestOutcome::response(0, 500, Duration::from_millis(10)),
            RequestOutcome::response(1, 500, Duration::from_millis(12)),
        ];
        let summary = RunSummary::from_outcomes(outcomes, Duration::from_millis(40));

        assert_eq!(summary.successful_requests, 0);
        assert_eq!(summary.failed_requests, 2);
        assert!(summary.percentiles.is_none());
        assert!(summary.throughput.is_none());
        assert!(summary.fastest_response.is_none());
    }

    #[test]
    fn percentiles_use_nearest_rank() {
        let outcomes = (1..=10).map(|i| ok(i as usize, i * 10)).collect();
        let summary = RunSummary::from_outcomes(outcomes, Duration::from_secs(1));
        let p = summary.percentiles.unwrap();

        // floor(0.5 * 9) = 4, floor(0.95 * 9) = 8, floor(0.99 * 9) = 8
        assert_eq!(p.p50, 0.050);
        assert_eq!(p.p95, 0.090);
        assert_eq!(p.p99, 0.090);
    }
}
