//! Test execution and aggregation.
//!
//! Every fixture is run independently: one fixture failing to execute or
//! decode never stops the others, and outcomes always come back in input
//! order so reports are stable.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug_span;

use crate::compare::{compare, Verdict};
use crate::error::{log_run_error, ExecutionError, RunError};
use crate::fixtures::Fixture;
use crate::runner::Runner;

/// Run one fixture's event and compare the result with its expectations.
pub fn run_test<R: Runner + ?Sized>(runner: &R, fixture: &Fixture) -> Result<Verdict, RunError> {
    let name = fixture.display_name();
    let _span = debug_span!("run_test", fixture = %name).entered();

    let result = runner.run(&fixture.event)?;
    let verdict = compare(fixture, &result)?;
    tracing::debug!(
        "[Run] {} -> ok={} utilization={}%",
        name,
        verdict.ok,
        verdict.utilization
    );
    Ok(verdict)
}

/// Result of one fixture within a run.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub fixture: Fixture,
    pub result: Result<Verdict, RunError>,
}

impl TestOutcome {
    fn new(fixture: Fixture, result: Result<Verdict, RunError>) -> Self {
        if let Err(err) = &result {
            log_run_error(err, &fixture.display_name());
        }
        Self { fixture, result }
    }

    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(verdict) if verdict.ok)
    }
}

/// Run fixtures one after another.
pub fn run_tests<R: Runner + ?Sized>(runner: &R, fixtures: &[Fixture]) -> Vec<TestOutcome> {
    fixtures
        .iter()
        .map(|fixture| TestOutcome::new(fixture.clone(), run_test(runner, fixture)))
        .collect()
}

/// Run fixtures with up to `jobs` executions in flight.
///
/// Executions are blocking calls, so each one is moved onto tokio's blocking
/// pool. Outcomes are yielded in input order regardless of completion order.
pub async fn run_tests_concurrent(
    runner: Arc<dyn Runner>,
    fixtures: Vec<Fixture>,
    jobs: usize,
) -> Vec<TestOutcome> {
    let jobs = jobs.max(1);
    stream::iter(fixtures)
        .map(|fixture| {
            let runner = Arc::clone(&runner);
            async move {
                let task_fixture = fixture.clone();
                let joined =
                    tokio::task::spawn_blocking(move || run_test(runner.as_ref(), &task_fixture))
                        .await;
                let result = match joined {
                    Ok(result) => result,
                    Err(err) => Err(RunError::from(ExecutionError::TaskFailed {
                        reason: err.to_string(),
                    })),
                };
                TestOutcome::new(fixture, result)
            }
        })
        .buffered(jobs)
        .collect()
        .await
}

/// Tally of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(verdict) if verdict.ok => summary.passed += 1,
                Ok(_) => summary.failed += 1,
                Err(_) => summary.errored += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}
