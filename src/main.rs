use anyhow::Context;
use search_bench::models::config::RunConfig;
use search_bench::report;
use search_bench::run_load_test;
use search_bench::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(&path)
            .with_context(|| format!("loading run config from {}", path))?,
        None => RunConfig::default(),
    };

    let summary = run_load_test(config.clone()).await?;

    if let Some(path) = &config.report_path {
        report::write_json(&summary, path)?;
    }

    Ok(())
}
