use std::fmt;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::{debug, info};
use serde::Deserialize;

use crate::compare::strip_error_prefix;
use crate::config::AwsConfig;
use crate::error::ExecutionError;
use crate::fixtures::Event;

use super::{ExecutionResult, Runner};

/// Stage of a CloudFront Function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionStage {
    Development,
    Live,
}

impl FunctionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionStage::Development => "DEVELOPMENT",
            FunctionStage::Live => "LIVE",
        }
    }
}

impl fmt::Display for FunctionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEVELOPMENT" => Ok(FunctionStage::Development),
            "LIVE" => Ok(FunctionStage::Live),
            other => Err(format!("unknown function stage: {other}")),
        }
    }
}

/// Function under test, written `NAME:STAGE` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTarget {
    pub name: String,
    pub stage: FunctionStage,
}

impl FunctionTarget {
    /// Parse `NAME:STAGE`; returns `None` for anything that does not name a
    /// stage explicitly.
    pub fn parse(spec: &str) -> Option<Self> {
        let (name, stage) = spec.split_once(':')?;
        if name.is_empty() {
            return None;
        }
        let stage = stage.parse().ok()?;
        Some(Self {
            name: name.to_string(),
            stage,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeFunctionResponse {
    #[serde(rename = "ETag", default)]
    etag: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TestFunctionResponse {
    test_result: TestResultPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct TestResultPayload {
    function_output: Option<String>,
    function_error_message: Option<String>,
    compute_utilization: Option<String>,
    function_execution_logs: Vec<String>,
}

impl TestResultPayload {
    fn into_result(self) -> Result<ExecutionResult, ExecutionError> {
        let utilization = match self.compute_utilization.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|err| ExecutionError::MalformedResponse {
                    reason: format!("invalid ComputeUtilization {raw:?}: {err}"),
                })?,
            None => 0,
        };
        for line in &self.function_execution_logs {
            debug!("[CloudFront] function log: {}", line);
        }
        Ok(ExecutionResult {
            output: self.function_output,
            error_message: self
                .function_error_message
                .map(|message| strip_error_prefix(&message)),
            utilization,
        })
    }
}

/// Runs events through CloudFront's TestFunction API.
///
/// Calls go through the AWS CLI so credentials, profiles and regions are
/// resolved exactly as they are for any other `aws` invocation. The event is
/// streamed to the CLI on stdin.
pub struct CloudFrontRunner {
    target: FunctionTarget,
    etag: Option<String>,
    aws: AwsConfig,
}

impl CloudFrontRunner {
    /// Look the function up and remember its ETag for subsequent test calls.
    pub fn connect(target: FunctionTarget, aws: &AwsConfig) -> Result<Self, ExecutionError> {
        let mut runner = Self {
            target,
            etag: None,
            aws: aws.clone(),
        };
        let stdout = runner.invoke("describe-function", &[], None)?;
        let described: DescribeFunctionResponse =
            serde_json::from_slice(&stdout).map_err(|err| ExecutionError::MalformedResponse {
                reason: format!("describe-function: {err}"),
            })?;
        runner.etag = described.etag;
        info!(
            "[CloudFront] Connected to {} (etag {})",
            runner.name(),
            runner.etag.as_deref().unwrap_or("none")
        );
        Ok(runner)
    }

    pub fn target(&self) -> &FunctionTarget {
        &self.target
    }

    fn invoke(
        &self,
        operation: &str,
        extra: &[&str],
        stdin: Option<&[u8]>,
    ) -> Result<Vec<u8>, ExecutionError> {
        let mut command = Command::new(&self.aws.program);
        command
            .arg("cloudfront")
            .arg(operation)
            .args(["--name", self.target.name.as_str()])
            .args(["--stage", self.target.stage.as_str()])
            .args(extra)
            .args(["--output", "json"]);
        if let Some(profile) = &self.aws.profile {
            command.args(["--profile", profile.as_str()]);
        }
        if let Some(region) = &self.aws.region {
            command.args(["--region", region.as_str()]);
        }
        command
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("[CloudFront] {} {}", self.aws.program, operation);
        let mut child = command.spawn().map_err(|err| ExecutionError::Launch {
            program: self.aws.program.clone(),
            reason: err.to_string(),
        })?;

        if let (Some(bytes), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // The CLI may exit before consuming stdin; its stderr explains why.
            if let Err(err) = pipe.write_all(bytes) {
                if err.kind() != ErrorKind::BrokenPipe {
                    return Err(ExecutionError::Launch {
                        program: self.aws.program.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|err| ExecutionError::Launch {
                program: self.aws.program.clone(),
                reason: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Backend {
                status: output.status.code(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl Runner for CloudFrontRunner {
    fn name(&self) -> String {
        format!("{} {}", self.target.name, self.target.stage)
    }

    fn run(&self, event: &Event) -> Result<ExecutionResult, ExecutionError> {
        let body = serde_json::to_vec(event).map_err(|err| ExecutionError::EventEncoding {
            reason: err.to_string(),
        })?;

        let mut extra = vec!["--event-object", "fileb:///dev/stdin"];
        if let Some(etag) = &self.etag {
            extra.push("--if-match");
            extra.push(etag.as_str());
        }

        let stdout = self.invoke("test-function", &extra, Some(&body))?;
        let response: TestFunctionResponse =
            serde_json::from_slice(&stdout).map_err(|err| ExecutionError::MalformedResponse {
                reason: format!("test-function: {err}"),
            })?;
        response.test_result.into_result()
    }
}
