use crate::digest::{Digester, Sha256Digester};
use crate::outcome::{DecodeStatus, ExecutionResult, ValidationOutcome};
use camino::Utf8Path;
use oggcmp_core::corpus::CorpusRegistry;
use oggcmp_core::error::{HarnessError, Result};
use std::io;

/// Turns an [`ExecutionResult`] into a [`ValidationOutcome`].
///
/// Non-zero exits are settled against the registry alone. A clean exit is
/// compared against the reference by size first; the digest is only computed
/// when both files have the same length.
pub struct OutputValidator<'a, D = Sha256Digester> {
    registry: &'a CorpusRegistry,
    digester: D,
}

impl<'a> OutputValidator<'a, Sha256Digester> {
    pub fn new(registry: &'a CorpusRegistry) -> Self {
        Self::with_digester(registry, Sha256Digester)
    }
}

impl<'a, D: Digester> OutputValidator<'a, D> {
    pub fn with_digester(registry: &'a CorpusRegistry, digester: D) -> Self {
        Self { registry, digester }
    }

    pub fn validate(&self, result: &ExecutionResult) -> Result<ValidationOutcome> {
        let expected = self.registry.expected_error(&result.sample_id);

        match DecodeStatus::classify(result.exit_code, expected) {
            DecodeStatus::ExpectedError(code) => Ok(ValidationOutcome::ExpectedError { code }),
            DecodeStatus::UnexpectedError { code, expected } => {
                Ok(ValidationOutcome::UnexpectedError { code, expected })
            }
            DecodeStatus::Success => {
                self.compare_files(&result.reference_path, &result.candidate_path)
            }
        }
    }

    /// Compare two files by size, then by digest.
    pub fn compare_files(
        &self,
        reference: &Utf8Path,
        candidate: &Utf8Path,
    ) -> Result<ValidationOutcome> {
        let reference_size = std::fs::metadata(reference)
            .map_err(|source| HarnessError::Reference {
                path: reference.to_string(),
                source,
            })?
            .len();

        let candidate_size = match std::fs::metadata(candidate) {
            Ok(meta) => Some(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if candidate_size != Some(reference_size) {
            return Ok(ValidationOutcome::SizeMismatch {
                reference: reference_size,
                candidate: candidate_size,
            });
        }

        let reference_digest =
            self.digester
                .digest(reference)
                .map_err(|source| HarnessError::Reference {
                    path: reference.to_string(),
                    source,
                })?;
        let candidate_digest = self.digester.digest(candidate)?;
        tracing::debug!("{} sha256 {}", candidate, candidate_digest);

        if reference_digest == candidate_digest {
            Ok(ValidationOutcome::Match {
                size: reference_size,
                digest: candidate_digest,
            })
        } else {
            Ok(ValidationOutcome::HashMismatch {
                size: reference_size,
                reference: reference_digest,
                candidate: candidate_digest,
            })
        }
    }
}
