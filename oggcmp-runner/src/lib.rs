// Build, run and compare decoder variants against reference output
pub mod aggregator;
pub mod builder;
pub mod digest;
pub mod harness;
pub mod invoker;
pub mod matrix;
pub mod outcome;
pub mod validator;

pub use aggregator::{ResultAggregator, RunSummary};
pub use builder::BuildOrchestrator;
pub use digest::{ContentDigest, Digester, Sha256Digester};
pub use harness::Harness;
pub use invoker::{Invoker, ProcessInvoker};
pub use matrix::ExecutionMatrix;
pub use outcome::{DecodeStatus, ExecutionResult, ValidationOutcome};
pub use validator::OutputValidator;
