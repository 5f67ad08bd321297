use crate::outcome::{ExecutionResult, ValidationOutcome};
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;

/// Final tally of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub cases: usize,
    pub matches: usize,
    pub expected_errors: usize,
    /// Sum of elapsed time over passing cases only.
    pub total_elapsed: Duration,
    /// Diagnostic of the fatal condition that stopped the run.
    pub failure: Option<String>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Process exit status for the harness itself.
    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }
}

/// Prints the per-case transcript, keeps the running timing total and decides
/// whether the run continues.
///
/// The first fatal outcome stops the run; anything recorded afterwards is
/// ignored.
pub struct ResultAggregator<W: Write> {
    out: W,
    total_elapsed: Duration,
    cases: usize,
    matches: usize,
    expected_errors: usize,
    failure: Option<String>,
}

impl ResultAggregator<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ResultAggregator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            total_elapsed: Duration::ZERO,
            cases: 0,
            matches: 0,
            expected_errors: 0,
            failure: None,
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    pub fn is_aborted(&self) -> bool {
        self.failure.is_some()
    }

    pub fn announce_build(&mut self) -> io::Result<()> {
        writeln!(self.out, "compile decoder variants...")
    }

    pub fn announce_checks(&mut self) -> io::Result<()> {
        writeln!(self.out, "check output file size & hash")
    }

    pub fn begin_variant(&mut self, variant_id: &str) -> io::Result<()> {
        writeln!(self.out, "TESTING {variant_id}")
    }

    /// Record one validated case.
    pub fn record(
        &mut self,
        result: &ExecutionResult,
        outcome: &ValidationOutcome,
    ) -> io::Result<ControlFlow<()>> {
        if self.is_aborted() {
            return Ok(ControlFlow::Break(()));
        }

        self.cases += 1;
        let secs = result.elapsed.as_secs_f64();

        match outcome {
            ValidationOutcome::Match { .. } => {
                self.matches += 1;
                self.total_elapsed += result.elapsed;
                writeln!(self.out, "  {} [OK] in {:.3} seconds", result.sample_id, secs)?;
                Ok(ControlFlow::Continue(()))
            }
            ValidationOutcome::ExpectedError { code } => {
                self.expected_errors += 1;
                self.total_elapsed += result.elapsed;
                writeln!(
                    self.out,
                    "  {} [OK: EXPECTED ERROR] code {} in {:.3} seconds",
                    result.sample_id, code, secs
                )?;
                Ok(ControlFlow::Continue(()))
            }
            fatal => {
                let diagnostic = Self::diagnose(result, fatal);
                self.fail(diagnostic)?;
                Ok(ControlFlow::Break(()))
            }
        }
    }

    pub fn record_build_failure(&mut self, variant_id: &str, reason: &str) -> io::Result<()> {
        self.fail(format!("build failed: variant {variant_id}: {reason}"))
    }

    pub fn record_launch_failure(
        &mut self,
        variant_id: &str,
        sample_id: &str,
        reason: &str,
    ) -> io::Result<()> {
        self.cases += 1;
        self.fail(format!(
            "unexpected decoder error: sample {sample_id}, variant {variant_id}, could not launch: {reason}"
        ))
    }

    /// Report a case whose reference output could not be read.
    pub fn record_reference_failure(
        &mut self,
        result: &ExecutionResult,
        reason: &str,
    ) -> io::Result<()> {
        self.cases += 1;
        self.fail(format!(
            "missing reference: sample {}, variant {}, filename: {}: {reason}",
            result.sample_id,
            result.variant_id,
            result.file_name()
        ))
    }

    fn diagnose(result: &ExecutionResult, outcome: &ValidationOutcome) -> String {
        let kind = outcome.kind();
        let sample = &result.sample_id;
        let variant = &result.variant_id;
        let file = result.file_name();

        match outcome {
            ValidationOutcome::SizeMismatch {
                reference,
                candidate: Some(size),
            } => format!(
                "{kind}: sample {sample}, variant {variant}, filename: {file}, size: {size} (reference {reference})"
            ),
            ValidationOutcome::SizeMismatch {
                reference,
                candidate: None,
            } => format!(
                "{kind}: sample {sample}, variant {variant}, filename: {file}, size: missing (reference {reference})"
            ),
            ValidationOutcome::HashMismatch { size, .. } => format!(
                "{kind}: sample {sample}, variant {variant}, filename: {file}, size: {size}"
            ),
            ValidationOutcome::UnexpectedError { code, expected } => format!(
                "{kind}: sample {sample}, variant {variant}, exit code {code} (expected {})",
                expected.unwrap_or(0)
            ),
            ValidationOutcome::Match { .. } | ValidationOutcome::ExpectedError { .. } => {
                format!("{kind}: sample {sample}, variant {variant}")
            }
        }
    }

    fn fail(&mut self, diagnostic: String) -> io::Result<()> {
        tracing::error!("{}", diagnostic);
        writeln!(self.out, "  [WRONG] {diagnostic}")?;
        self.failure = Some(diagnostic);
        Ok(())
    }

    /// Print the closing line and hand back the tally.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        if self.is_aborted() {
            writeln!(self.out, "stopped due to error...")?;
        } else {
            writeln!(
                self.out,
                "PASSED {} cases ({} matched, {} expected errors) in {:.3} seconds total",
                self.cases,
                self.matches,
                self.expected_errors,
                self.total_elapsed.as_secs_f64()
            )?;
        }
        self.out.flush()?;

        Ok(RunSummary {
            cases: self.cases,
            matches: self.matches,
            expected_errors: self.expected_errors,
            total_elapsed: self.total_elapsed,
            failure: self.failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::ContentDigest;

    fn result(sample: &str, millis: u64) -> ExecutionResult {
        ExecutionResult {
            sample_id: sample.to_owned(),
            variant_id: "decode_filename".to_owned(),
            exit_code: 0,
            elapsed: Duration::from_millis(millis),
            reference_path: format!("c_output/[decode_filename]_{sample}.out").into(),
            candidate_path: format!("rust_output/[decode_filename]_{sample}.out").into(),
        }
    }

    fn matched() -> ValidationOutcome {
        ValidationOutcome::Match {
            size: 4,
            digest: ContentDigest::from_hex("abcd"),
        }
    }

    #[test]
    fn test_match_line_and_timing() {
        let mut buf = Vec::new();
        let mut aggregator = ResultAggregator::new(&mut buf);

        let flow = aggregator.record(&result("mono", 250), &matched()).unwrap();
        assert!(flow.is_continue());
        let flow = aggregator
            .record(
                &result("empty-page", 750),
                &ValidationOutcome::ExpectedError { code: 30 },
            )
            .unwrap();
        assert!(flow.is_continue());
        assert_eq!(aggregator.total_elapsed(), Duration::from_secs(1));

        let summary = aggregator.finish().unwrap();
        assert!(summary.passed());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.matches, 1);
        assert_eq!(summary.expected_errors, 1);

        let transcript = String::from_utf8(buf).unwrap();
        assert!(transcript.contains("mono [OK] in 0.250 seconds"));
        assert!(transcript.contains("empty-page [OK: EXPECTED ERROR] code 30"));
        assert!(transcript.contains(
            "PASSED 2 cases (1 matched, 1 expected errors) in 1.000 seconds total"
        ));
    }

    #[test]
    fn test_fatal_outcome_breaks_and_excludes_timing() {
        let mut buf = Vec::new();
        let mut aggregator = ResultAggregator::new(&mut buf);

        let flow = aggregator.record(&result("mono", 100), &matched()).unwrap();
        assert!(flow.is_continue());
        let flow = aggregator
            .record(
                &result("stereo_short", 900),
                &ValidationOutcome::SizeMismatch {
                    reference: 1024,
                    candidate: Some(1023),
                },
            )
            .unwrap();
        assert!(flow.is_break());
        assert_eq!(aggregator.total_elapsed(), Duration::from_millis(100));

        let summary = aggregator.finish().unwrap();
        assert!(!summary.passed());
        assert_eq!(summary.exit_code(), 1);

        let transcript = String::from_utf8(buf).unwrap();
        assert!(transcript.contains(
            "[WRONG] size mismatch: sample stereo_short, variant decode_filename, \
             filename: [decode_filename]_stereo_short.out, size: 1023 (reference 1024)"
        ));
        assert!(transcript.ends_with("stopped due to error...\n"));
    }

    #[test]
    fn test_nothing_recorded_after_abort() {
        let mut buf = Vec::new();
        let mut aggregator = ResultAggregator::new(&mut buf);

        let flow = aggregator
            .record(
                &result("square-interleaved", 10),
                &ValidationOutcome::UnexpectedError {
                    code: 0,
                    expected: Some(20),
                },
            )
            .unwrap();
        assert!(flow.is_break());
        let flow = aggregator.record(&result("mono", 10), &matched()).unwrap();
        assert!(flow.is_break());

        let summary = aggregator.finish().unwrap();
        assert_eq!(summary.cases, 1);
        assert_eq!(summary.matches, 0);

        let transcript = String::from_utf8(buf).unwrap();
        assert!(transcript.contains("exit code 0 (expected 20)"));
        assert!(!transcript.contains("mono [OK]"));
    }

    #[test]
    fn test_build_failure_fails_run() {
        let mut buf = Vec::new();
        let mut aggregator = ResultAggregator::new(&mut buf);

        aggregator
            .record_build_failure("decode_filename", "cargo exited with exit status: 101")
            .unwrap();
        let summary = aggregator.finish().unwrap();

        assert_eq!(summary.cases, 0);
        assert_eq!(summary.exit_code(), 1);
        let transcript = String::from_utf8(buf).unwrap();
        assert!(transcript.contains("[WRONG] build failed: variant decode_filename"));
    }

    #[test]
    fn test_reference_failure_fails_run() {
        let mut buf = Vec::new();
        let mut aggregator = ResultAggregator::new(&mut buf);

        aggregator
            .record_reference_failure(&result("mono", 10), "No such file or directory")
            .unwrap();
        assert!(aggregator.is_aborted());
        let summary = aggregator.finish().unwrap();

        assert_eq!(summary.cases, 1);
        assert_eq!(summary.exit_code(), 1);
        let transcript = String::from_utf8(buf).unwrap();
        assert!(transcript.contains(
            "[WRONG] missing reference: sample mono, variant decode_filename, \
             filename: [decode_filename]_mono.out: No such file or directory"
        ));
        assert!(transcript.ends_with("stopped due to error...\n"));
    }
}
