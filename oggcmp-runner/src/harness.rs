use crate::aggregator::{ResultAggregator, RunSummary};
use crate::builder::BuildOrchestrator;
use crate::digest::Digester;
use crate::invoker::Invoker;
use crate::matrix::ExecutionMatrix;
use oggcmp_core::config::Config;
use oggcmp_core::corpus::CorpusRegistry;
use oggcmp_core::error::{HarnessError, Result};
use oggcmp_core::variant::BuildProfile;
use std::io::Write;

/// One full comparison run: build every variant, then run the matrix.
pub struct Harness<'a> {
    config: &'a Config,
    registry: CorpusRegistry,
    profile: BuildProfile,
}

impl<'a> Harness<'a> {
    pub fn new(config: &'a Config, profile: BuildProfile) -> Result<Self> {
        let registry = config.registry()?;
        Ok(Self {
            config,
            registry,
            profile,
        })
    }

    pub fn registry(&self) -> &CorpusRegistry {
        &self.registry
    }

    /// Run with the process invoker and SHA-256 digests.
    pub fn run<W: Write>(&self, aggregator: ResultAggregator<W>) -> Result<RunSummary> {
        self.run_matrix(&self.matrix(), aggregator)
    }

    pub fn run_matrix<W: Write, I: Invoker, D: Digester>(
        &self,
        matrix: &ExecutionMatrix<'_, I, D>,
        mut aggregator: ResultAggregator<W>,
    ) -> Result<RunSummary> {
        tracing::info!(
            "{} variants x {} samples, {} expected to fail ({} profile)",
            self.config.variants.len(),
            self.registry.len(),
            self.registry.expected_failure_count(),
            self.profile
        );

        aggregator.announce_build()?;
        let orchestrator = BuildOrchestrator::new(&self.config.build, self.profile);
        match orchestrator.build_all(&self.config.variants) {
            Ok(()) => {}
            Err(HarnessError::Build { variant, reason }) => {
                aggregator.record_build_failure(&variant, &reason)?;
                return Ok(aggregator.finish()?);
            }
            Err(e) => return Err(e),
        }

        aggregator.announce_checks()?;
        if let Err(e) = matrix.run(&mut aggregator) {
            // Close the transcript when the error was already reported as a case
            if aggregator.is_aborted() {
                aggregator.finish()?;
            }
            return Err(e);
        }
        Ok(aggregator.finish()?)
    }

    /// Matrix over this harness's registry, for swapping in test doubles.
    pub fn matrix(&self) -> ExecutionMatrix<'_> {
        ExecutionMatrix::new(self.config, &self.registry, self.profile)
    }
}
