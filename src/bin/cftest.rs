use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use cftest::config::{HarnessConfig, DEFAULT_CONFIG_PATH};
use cftest::error::log_fixture_error;
use cftest::fixtures::{discover_fixtures, load_fixtures};
use cftest::run::{run_tests_concurrent, RunSummary};
use cftest::runner::{CloudFrontRunner, FunctionTarget, Runner};
use clap::{ArgAction, Parser};
use tracing::Level;

#[path = "cftest_cli/report.rs"]
mod report;

#[derive(Parser, Debug)]
#[command(
    name = "cftest",
    about = "Run JSON test fixtures against a CloudFront Function"
)]
struct Cli {
    /// Function under test, e.g. `redirects:DEVELOPMENT` or `redirects:LIVE`
    #[arg(value_name = "FUNCTION:STAGE")]
    function: String,
    /// Fixture files, or directories whose *.json files are fixtures
    #[arg(value_name = "FIXTURE", required = true)]
    fixtures: Vec<PathBuf>,
    /// Harness configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// AWS CLI program to invoke (overrides config)
    #[arg(long)]
    aws_bin: Option<String>,
    /// AWS profile (overrides config)
    #[arg(long)]
    profile: Option<String>,
    /// AWS region (overrides config)
    #[arg(long)]
    region: Option<String>,
    /// Number of fixtures to run concurrently (overrides config)
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::load_from_file(&self.config);
        if let Some(program) = &self.aws_bin {
            config.aws.program = program.clone();
        }
        if let Some(profile) = &self.profile {
            config.aws.profile = Some(profile.clone());
        }
        if let Some(region) = &self.region {
            config.aws.region = Some(region.clone());
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.harness_config();

    let target = FunctionTarget::parse(&cli.function).ok_or_else(|| anyhow!("function not found"))?;
    let runner = CloudFrontRunner::connect(target, &config.aws)
        .with_context(|| format!("connecting to {}", cli.function))?;
    println!("Testing {}:", runner.name());

    let paths = discover_fixtures(&cli.fixtures).map_err(|err| {
        log_fixture_error(&err, "discovery");
        err
    })?;
    let fixtures = load_fixtures(&paths).map_err(|err| {
        log_fixture_error(&err, "load");
        err
    })?;
    let width = report::name_width(&fixtures, config.report.min_name_width);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let runner: Arc<dyn Runner> = Arc::new(runner);
    let outcomes = runtime.block_on(run_tests_concurrent(runner, fixtures, config.jobs));

    for outcome in &outcomes {
        println!("{}", report::format_outcome(outcome, width));
    }

    let summary = RunSummary::from_outcomes(&outcomes);
    println!("{}", report::format_summary(&summary));

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
