use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use colored::*;
use hyper::Uri;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::{build_client, send_request, HttpsClient};
use crate::error::LoadError;
use crate::models::config::RunConfig;
use crate::models::metrics::RunSummary;
use crate::models::outcome::RequestOutcome;
use crate::report;
use crate::utils::hardware::get_host_info;

/// Fires `config.requests` GETs with at most `config.concurrency` in
/// flight, then prints and returns the summary.
///
/// Outcomes are handled in completion order. Failed requests never abort
/// the run; only setup problems or a panicking worker do.
pub async fn run_load_test(config: RunConfig) -> Result<RunSummary, LoadError> {
    run_load_test_to(config, &mut io::stdout()).await
}

/// Same as [`run_load_test`], with the report lines written to `out`.
/// Each failure line is written and flushed as soon as it is observed.
pub async fn run_load_test_to<W: Write>(
    config: RunConfig,
    out: &mut W,
) -> Result<RunSummary, LoadError> {
    config.validate()?;
    let url = config.target_url()?;
    let uri: Uri = url.as_str().parse()?;

    for line in report::config_lines(url.as_str(), &config) {
        writeln!(out, "{}", line.bold())?;
    }
    out.flush()?;

    let host = get_host_info();
    info!(
        target_url = %url,
        requests = config.requests,
        concurrency = config.concurrency,
        timeout_ms = config.timeout_ms,
        cpu_cores = host.cpu_cores,
        "starting load run"
    );

    let client = Arc::new(build_client());
    let permits = Arc::new(Semaphore::new(config.concurrency));
    let max_request_duration = config.timeout();
    let started = Instant::now();

    let mut tasks = JoinSet::new();
    for index in 0..config.requests {
        let client = Arc::clone(&client);
        let permits = Arc::clone(&permits);
        let uri = uri.clone();

        tasks.spawn(async move {
            dispatch(permits, &client, &uri, max_request_duration, index).await
        });
    }

    let mut outcomes = Vec::with_capacity(config.requests);
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined??;
        if outcome.is_success() {
            debug!(index = outcome.index, elapsed = ?outcome.elapsed, "request ok");
        } else {
            warn!(
                index = outcome.index,
                status = ?outcome.status,
                error = ?outcome.error,
                "request failed"
            );
            writeln!(out, "{}", report::failure_line(&outcome).red())?;
            out.flush()?;
        }
        outcomes.push(outcome);
    }

    let total = started.elapsed();
    let summary = RunSummary {
        target_url: url.to_string(),
        concurrency: config.concurrency,
        timestamp: Local::now().format("%Y/%m/%d %H:%M:%S").to_string(),
        host,
        ..RunSummary::from_outcomes(outcomes, total)
    };

    for line in report::summary_lines(&summary) {
        if summary.successful_requests > 0 {
            writeln!(out, "{}", line.green().bold())?;
        } else {
            writeln!(out, "{}", line.yellow().bold())?;
        }
    }
    out.flush()?;

    info!(
        ok = summary.successful_requests,
        failed = summary.failed_requests,
        total_secs = summary.total_secs,
        "load run finished"
    );

    Ok(summary)
}

/// Waits for a pool slot, then sends request `index`. The permit is held
/// until the outcome is ready.
async fn dispatch(
    permits: Arc<Semaphore>,
    client: &HttpsClient,
    uri: &Uri,
    max_request_duration: Duration,
    index: usize,
) -> Result<RequestOutcome, LoadError> {
    let _permit = permits.acquire_owned().await?;
    Ok(send_request(client, uri, max_request_duration, index).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_pool_refuses_to_dispatch() {
        let permits = Arc::new(Semaphore::new(1));
        permits.close();
        let client = build_client();
        let uri: Uri = "http://127.0.0.1:9/search?q=x".parse().unwrap();

        let result = dispatch(permits, &client, &uri, Duration::from_millis(100), 0).await;

        assert!(matches!(result, Err(LoadError::PoolClosed(_))));
    }

    #[tokio::test]
    async fn zero_requests_print_config_and_empty_summary() {
        colored::control::set_override(false);
        let config = RunConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            requests: 0,
            concurrency: 1,
            ..Default::default()
        };

        let mut out = Vec::new();
        run_load_test_to(config, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3, "{}", text);
        assert_eq!(lines[1], "REQUESTS=0 CONCURRENCY=1");
        assert!(lines[2].starts_with("OK=0 FAIL=0 total="));
    }
}
