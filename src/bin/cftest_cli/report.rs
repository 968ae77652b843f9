use cftest::fixtures::Fixture;
use cftest::run::{RunSummary, TestOutcome};

/// Width of the name column: the longest fixture name, but at least `min`.
pub fn name_width(fixtures: &[Fixture], min: usize) -> usize {
    fixtures
        .iter()
        .map(|fixture| fixture.display_name().chars().count())
        .fold(min, usize::max)
}

/// One report entry; failures and errors carry their details and a trailing
/// blank line.
pub fn format_outcome(outcome: &TestOutcome, width: usize) -> String {
    let name = outcome.fixture.display_name();
    match &outcome.result {
        Ok(verdict) if verdict.ok => {
            format!("✔ {name:<width$}  ok    ({}%)", verdict.utilization)
        }
        Ok(verdict) => format!(
            "✘ {name:<width$}  FAIL  ({}%)\n{}\n",
            verdict.utilization, verdict.failure
        ),
        Err(err) => format!("✘ {name:<width$}  ERROR\n{err}\n"),
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{} passed, {} failed, {} errored",
        summary.passed, summary.failed, summary.errored
    )
}
