use crate::aggregator::ResultAggregator;
use crate::digest::{Digester, Sha256Digester};
use crate::invoker::{Invoker, ProcessInvoker};
use crate::outcome::ExecutionResult;
use crate::validator::OutputValidator;
use camino::Utf8Path;
use oggcmp_core::config::Config;
use oggcmp_core::corpus::{CorpusRegistry, SampleCase};
use oggcmp_core::error::{HarnessError, Result};
use oggcmp_core::variant::{BinaryVariant, BuildProfile};
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Instant;

/// Drives every (variant, sample) pair, one invocation at a time.
///
/// Variants run in configuration order and samples in registry order. Once
/// the aggregator reports a fatal outcome no further case is started.
pub struct ExecutionMatrix<'a, I = ProcessInvoker, D = Sha256Digester> {
    config: &'a Config,
    registry: &'a CorpusRegistry,
    profile: BuildProfile,
    invoker: I,
    validator: OutputValidator<'a, D>,
}

impl<'a> ExecutionMatrix<'a, ProcessInvoker, Sha256Digester> {
    pub fn new(config: &'a Config, registry: &'a CorpusRegistry, profile: BuildProfile) -> Self {
        Self {
            config,
            registry,
            profile,
            invoker: ProcessInvoker,
            validator: OutputValidator::new(registry),
        }
    }
}

impl<'a, I: Invoker, D: Digester> ExecutionMatrix<'a, I, D> {
    pub fn with_invoker<J: Invoker>(self, invoker: J) -> ExecutionMatrix<'a, J, D> {
        ExecutionMatrix {
            config: self.config,
            registry: self.registry,
            profile: self.profile,
            invoker,
            validator: self.validator,
        }
    }

    pub fn with_digester<E: Digester>(self, digester: E) -> ExecutionMatrix<'a, I, E> {
        ExecutionMatrix {
            config: self.config,
            registry: self.registry,
            profile: self.profile,
            invoker: self.invoker,
            validator: OutputValidator::with_digester(self.registry, digester),
        }
    }

    /// Run every case until the aggregator records a fatal outcome.
    ///
    /// The aggregator owns the verdict; read it back through
    /// [`ResultAggregator::is_aborted`] or [`ResultAggregator::finish`].
    pub fn run<W: Write>(&self, aggregator: &mut ResultAggregator<W>) -> Result<()> {
        std::fs::create_dir_all(&self.config.paths.candidate_dir)?;

        for variant in &self.config.variants {
            if self.run_variant(variant, aggregator)?.is_break() {
                tracing::debug!("Skipping remaining variants after {}", variant.id);
                break;
            }
        }
        Ok(())
    }

    fn run_variant<W: Write>(
        &self,
        variant: &BinaryVariant,
        aggregator: &mut ResultAggregator<W>,
    ) -> Result<ControlFlow<()>> {
        aggregator.begin_variant(&variant.id)?;
        let executable = variant.executable_path(
            &self.config.build.working_dir,
            self.profile,
            &self.config.build.executable,
        );
        tracing::info!("Testing {} with {}", variant.id, executable);

        for sample in self.registry.cases() {
            let result = match self.execute(variant, &executable, sample) {
                Ok(result) => result,
                Err(HarnessError::Launch { source, .. }) => {
                    aggregator.record_launch_failure(
                        &variant.id,
                        &sample.id,
                        &format!("{executable}: {source}"),
                    )?;
                    return Ok(ControlFlow::Break(()));
                }
                Err(e) => return Err(e),
            };

            let outcome = match self.validator.validate(&result) {
                Ok(outcome) => outcome,
                Err(HarnessError::Reference { path, source }) => {
                    aggregator.record_reference_failure(&result, &source.to_string())?;
                    return Err(HarnessError::Reference { path, source });
                }
                Err(e) => return Err(e),
            };
            if aggregator.record(&result, &outcome)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Invoke `variant` once on `sample` and time it.
    pub fn execute(
        &self,
        variant: &BinaryVariant,
        executable: &Utf8Path,
        sample: &SampleCase,
    ) -> Result<ExecutionResult> {
        let input = self.config.input_path(&sample.id);
        let file_name = variant.output_file_name(&sample.id);
        let reference_path = self.config.paths.reference_dir.join(&file_name);
        let candidate_path = self.config.paths.candidate_dir.join(&file_name);

        match std::fs::remove_file(&candidate_path) {
            Ok(()) => tracing::debug!("Removed stale {}", candidate_path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let args = variant.invocation_args(&input, &candidate_path);
        let start = Instant::now();
        let exit_code = self
            .invoker
            .invoke(executable, &args)
            .map_err(|source| HarnessError::Launch {
                executable: executable.to_string(),
                sample: sample.id.clone(),
                source,
            })?;
        let elapsed = start.elapsed();

        Ok(ExecutionResult {
            sample_id: sample.id.clone(),
            variant_id: variant.id.clone(),
            exit_code,
            elapsed,
            reference_path,
            candidate_path,
        })
    }
}
