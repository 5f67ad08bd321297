use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named input from the corpus, optionally tagged with the exit code a
/// conformant decoder must return for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SampleCase {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<i32>,
}

impl SampleCase {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expected_error: None,
        }
    }

    pub fn failing(id: impl Into<String>, code: i32) -> Self {
        Self {
            id: id.into(),
            expected_error: Some(code),
        }
    }
}

/// Ordered sample table plus the expected-error lookup.
///
/// Order is the run and report order. The registry is immutable once built.
#[derive(Debug, Clone)]
pub struct CorpusRegistry {
    cases: Vec<SampleCase>,
    index: HashMap<String, usize>,
}

impl CorpusRegistry {
    pub fn new(cases: Vec<SampleCase>) -> Result<Self> {
        let mut index = HashMap::with_capacity(cases.len());
        for (position, case) in cases.iter().enumerate() {
            if case.id.trim().is_empty() {
                return Err(HarnessError::Config(format!(
                    "Sample at position {position} has an empty id"
                )));
            }
            if index.insert(case.id.clone(), position).is_some() {
                return Err(HarnessError::DuplicateSample(case.id.clone()));
            }
        }

        Ok(Self { cases, index })
    }

    pub fn cases(&self) -> impl Iterator<Item = &SampleCase> {
        self.cases.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SampleCase> {
        self.index.get(id).map(|&position| &self.cases[position])
    }

    /// Exit code registered for `id`, if its correct behavior is a failure.
    pub fn expected_error(&self, id: &str) -> Option<i32> {
        self.get(id).and_then(|case| case.expected_error)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Number of samples whose correct behavior is a decode failure.
    pub fn expected_failure_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| case.expected_error.is_some())
            .count()
    }
}

// Decoder exit codes used by the bundled corpus
const FEATURE_NOT_SUPPORTED: i32 = 4;
const INVALID_SETUP: i32 = 20;
const MISSING_CAPTURE_PATTERN: i32 = 30;

/// The bundled Vorbis conformance corpus.
pub fn default_samples() -> Vec<SampleCase> {
    vec![
        SampleCase::new("single-code-2bits"),
        SampleCase::new("single-code-nonsparse"),
        SampleCase::new("single-code-ordered"),
        SampleCase::new("single-code-sparse"),
        SampleCase::new("6ch-all-page-types"),
        SampleCase::new("6ch-long-first-packet"),
        SampleCase::new("6ch-moving-sine"),
        SampleCase::failing("6ch-moving-sine-floor0", FEATURE_NOT_SUPPORTED),
        SampleCase::new("bitrate-123"),
        SampleCase::new("bitrate-456-0"),
        SampleCase::new("bitrate-456-789"),
        SampleCase::failing("empty-page", MISSING_CAPTURE_PATTERN),
        SampleCase::new("noise-6ch"),
        SampleCase::new("noise-stereo"),
        SampleCase::new("sample-rate-max"),
        SampleCase::failing("sketch008-floor0", FEATURE_NOT_SUPPORTED),
        SampleCase::new("square"),
        SampleCase::failing("square-interleaved", INVALID_SETUP),
        SampleCase::new("square-stereo"),
        SampleCase::failing("thingy-floor0", FEATURE_NOT_SUPPORTED),
    ]
}
