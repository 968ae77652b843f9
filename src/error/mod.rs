// Error types for the cftest harness
//
// This module defines the error families raised while loading fixtures,
// executing them against a backend and decoding what the backend produced.
// Mismatches between actual and expected output are not errors; they are
// reported as failing verdicts.

mod execution;
mod fixture;

pub use execution::{log_run_error, ExecutionError, ExecutionErrorCodes, RunError, RunErrorCodes};
pub use fixture::{log_fixture_error, FixtureError, FixtureErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types so the CLI and logs report them consistently.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
