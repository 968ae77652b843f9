// Execution and decode error types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Execution backend error code constants
///
/// Error code range: 4001-4005
pub struct ExecutionErrorCodes {}

impl ExecutionErrorCodes {
    /// Backend process could not be started
    pub const LAUNCH: i32 = 4001;

    /// Backend reported a failure
    pub const BACKEND: i32 = 4002;

    /// Backend answered with something that could not be understood
    pub const MALFORMED_RESPONSE: i32 = 4003;

    /// Event could not be serialized for the backend
    pub const EVENT_ENCODING: i32 = 4004;

    /// The task running the backend call died
    pub const TASK_FAILED: i32 = 4005;
}

/// Per-fixture run error code constants
///
/// Error code range: 5001-5002
pub struct RunErrorCodes {}

impl RunErrorCodes {
    /// The execution backend failed
    pub const EXECUTION: i32 = 5001;

    /// The function output was not valid JSON
    pub const DECODE: i32 = 5002;
}

/// Failures raised by a [`Runner`](crate::runner::Runner)
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// The backend program could not be started
    Launch { program: String, reason: String },

    /// The backend ran but reported a failure; `message` is passed through verbatim
    Backend {
        status: Option<i32>,
        message: String,
    },

    /// The backend answered with a payload that could not be interpreted
    MalformedResponse { reason: String },

    /// The event could not be serialized
    EventEncoding { reason: String },

    /// The worker running the call panicked or was cancelled
    TaskFailed { reason: String },
}

impl ErrorCode for ExecutionError {
    fn code(&self) -> i32 {
        match self {
            ExecutionError::Launch { .. } => ExecutionErrorCodes::LAUNCH,
            ExecutionError::Backend { .. } => ExecutionErrorCodes::BACKEND,
            ExecutionError::MalformedResponse { .. } => ExecutionErrorCodes::MALFORMED_RESPONSE,
            ExecutionError::EventEncoding { .. } => ExecutionErrorCodes::EVENT_ENCODING,
            ExecutionError::TaskFailed { .. } => ExecutionErrorCodes::TASK_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            ExecutionError::Launch { program, reason } => {
                format!("failed to launch {}: {}", program, reason)
            }
            ExecutionError::Backend { message, .. } => message.clone(),
            ExecutionError::MalformedResponse { reason } => {
                format!("unexpected backend response: {}", reason)
            }
            ExecutionError::EventEncoding { reason } => {
                format!("failed to encode event: {}", reason)
            }
            ExecutionError::TaskFailed { reason } => {
                format!("runner task failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ExecutionError {}

/// Log a run error with structured context
pub fn log_run_error(err: &RunError, context: &str) {
    error!(
        "Run error in {}: code={}, component=Comparator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors that stop a single fixture before a verdict can be produced
///
/// These are reported separately from failing verdicts and never abort the
/// remaining fixtures of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// The execution backend failed
    Execution(ExecutionError),

    /// The function output is not valid JSON
    Decode { reason: String },
}

impl ErrorCode for RunError {
    fn code(&self) -> i32 {
        match self {
            RunError::Execution(_) => RunErrorCodes::EXECUTION,
            RunError::Decode { .. } => RunErrorCodes::DECODE,
        }
    }

    fn message(&self) -> String {
        match self {
            RunError::Execution(err) => err.message(),
            RunError::Decode { reason } => format!("JSON decode error: {}", reason),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Execution(err) => Some(err),
            RunError::Decode { .. } => None,
        }
    }
}

impl From<ExecutionError> for RunError {
    fn from(err: ExecutionError) -> Self {
        RunError::Execution(err)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(err: serde_json::Error) -> Self {
        RunError::Decode {
            reason: err.to_string(),
        }
    }
}
