use anyhow::{Context, Result};
use oggcmp_core::config::Config;
use oggcmp_core::variant::BuildProfile;
use oggcmp_runner::{Harness, ResultAggregator, RunSummary};
use tracing::{info, warn};

pub fn run(config: &Config, profile: BuildProfile) -> Result<RunSummary> {
    let harness = Harness::new(config, profile).context("Invalid corpus registry")?;
    if harness.registry().is_empty() {
        warn!("Corpus registry is empty, only the build step will run");
    }

    let summary = harness
        .run(ResultAggregator::stdout())
        .context("Comparison run aborted")?;

    if summary.passed() {
        info!(
            "All {} cases passed in {:.3}s",
            summary.cases,
            summary.total_elapsed.as_secs_f64()
        );
    }

    Ok(summary)
}
