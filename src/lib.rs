// cftest - fixture-driven test harness for CloudFront Functions
// Loads declarative JSON fixtures, runs their events through a backend and
// compares what the function produced with what the fixture expects.

// Module declarations
pub mod compare;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod run;
pub mod runner;

// Re-exports for convenience
pub use compare::{compare, Verdict};
pub use config::HarnessConfig;
pub use error::{ErrorCode, ExecutionError, FixtureError, RunError};
pub use fixtures::{discover_fixtures, load_fixture, load_fixtures, Event, Fixture};
pub use run::{run_test, run_tests, run_tests_concurrent, RunSummary, TestOutcome};
pub use runner::{CannedRunner, CloudFrontRunner, ExecutionResult, FunctionStage, FunctionTarget, Runner};
