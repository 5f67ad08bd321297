use crate::digest::ContentDigest;
use camino::Utf8PathBuf;
use std::time::Duration;

/// Exit code reported when the decoder died without one (killed by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// Typed view of a decoder's exit code against the expected-error registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Exit code 0 for a sample with no registered failure.
    Success,
    /// Non-zero exit code equal to the registered one.
    ExpectedError(i32),
    /// Anything else, including exit 0 where a failure was registered.
    UnexpectedError { code: i32, expected: Option<i32> },
}

impl DecodeStatus {
    pub fn classify(exit_code: i32, expected: Option<i32>) -> Self {
        match (exit_code, expected) {
            (0, None) => DecodeStatus::Success,
            (code, Some(expected)) if code != 0 && code == expected => {
                DecodeStatus::ExpectedError(code)
            }
            (code, expected) => DecodeStatus::UnexpectedError { code, expected },
        }
    }
}

/// One decoder invocation for a (variant, sample) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub sample_id: String,
    pub variant_id: String,
    pub exit_code: i32,
    pub elapsed: Duration,
    pub reference_path: Utf8PathBuf,
    pub candidate_path: Utf8PathBuf,
}

impl ExecutionResult {
    /// Shared file name of the reference and candidate outputs.
    pub fn file_name(&self) -> &str {
        self.candidate_path
            .file_name()
            .unwrap_or(self.candidate_path.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Match {
        size: u64,
        digest: ContentDigest,
    },
    /// `candidate` is `None` when the decoder exited 0 without writing output.
    SizeMismatch {
        reference: u64,
        candidate: Option<u64>,
    },
    HashMismatch {
        size: u64,
        reference: ContentDigest,
        candidate: ContentDigest,
    },
    ExpectedError {
        code: i32,
    },
    UnexpectedError {
        code: i32,
        expected: Option<i32>,
    },
}

impl ValidationOutcome {
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ValidationOutcome::Match { .. } | ValidationOutcome::ExpectedError { .. }
        )
    }

    /// Short name of the outcome, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationOutcome::Match { .. } => "match",
            ValidationOutcome::SizeMismatch { .. } => "size mismatch",
            ValidationOutcome::HashMismatch { .. } => "hash mismatch",
            ValidationOutcome::ExpectedError { .. } => "expected error",
            ValidationOutcome::UnexpectedError { .. } => "unexpected decoder error",
        }
    }
}
