//! Shared test helpers for the oggcmp workspace
//!
//! Only available when the "test-utils" feature is enabled.

use crate::config::{BuildConfig, Config, PathsConfig};
use crate::corpus::{CorpusRegistry, SampleCase};
use crate::variant::BinaryVariant;
use camino::Utf8Path;

/// Build a registry from `(id, expected_error)` pairs, panicking on duplicates
///
/// # Examples
///
/// ```
/// # use oggcmp_core::test_utils::registry;
/// let registry = registry(&[("mono", None), ("empty-page", Some(30))]);
/// assert_eq!(registry.expected_error("empty-page"), Some(30));
/// ```
pub fn registry(entries: &[(&str, Option<i32>)]) -> CorpusRegistry {
    let cases = entries
        .iter()
        .map(|(id, expected_error)| SampleCase {
            id: (*id).to_owned(),
            expected_error: *expected_error,
        })
        .collect();
    CorpusRegistry::new(cases).expect("test registry must have unique ids")
}

/// Configuration rooted at `root` with `corpus/`, `reference/` and `candidate/`
/// subdirectories and prebuilt variants pointing at the given executables.
pub fn config_in(
    root: &Utf8Path,
    variants: &[(&str, &Utf8Path)],
    samples: &[(&str, Option<i32>)],
) -> Config {
    Config {
        paths: PathsConfig {
            corpus_dir: root.join("corpus"),
            corpus_extension: "ogg".to_owned(),
            reference_dir: root.join("reference"),
            candidate_dir: root.join("candidate"),
        },
        build: BuildConfig {
            working_dir: root.to_owned(),
            ..BuildConfig::default()
        },
        variants: variants
            .iter()
            .map(|(id, exe)| BinaryVariant::prebuilt(*id, exe.as_str()))
            .collect(),
        samples: samples
            .iter()
            .map(|(id, expected_error)| SampleCase {
                id: (*id).to_owned(),
                expected_error: *expected_error,
            })
            .collect(),
    }
}
