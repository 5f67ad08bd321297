#![allow(clippy::cargo_common_metadata)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod variant;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use corpus::{CorpusRegistry, SampleCase};
pub use error::{HarnessError, Result};
pub use variant::{BinaryVariant, BuildProfile};
