//! Execution backends for fixture events.
//!
//! The comparison engine only needs one capability from a backend: run a
//! fully-normalized [`Event`] and hand back what the function produced.
//! [`CloudFrontRunner`] talks to CloudFront through the AWS CLI;
//! [`CannedRunner`] returns preconfigured results for tests.

use serde::{Deserialize, Serialize};

use crate::error::ExecutionError;
use crate::fixtures::Event;

/// What the backend reported for one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Serialized JSON produced by the function, if any
    pub output: Option<String>,
    /// Error message raised while running the function, if any
    pub error_message: Option<String>,
    /// Compute utilization reported by the backend
    pub utilization: u32,
}

/// Trait implemented by execution backends.
///
/// A failed `run` is fatal for that fixture only; callers never retry.
pub trait Runner: Send + Sync {
    /// Human-readable identity of the function being tested
    fn name(&self) -> String;

    /// Execute the function against one event
    fn run(&self, event: &Event) -> Result<ExecutionResult, ExecutionError>;
}

mod canned;
mod cloudfront;

pub use canned::CannedRunner;
pub use cloudfront::{CloudFrontRunner, FunctionStage, FunctionTarget};
