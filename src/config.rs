//! Harness configuration
//!
//! Settings are read from a JSON file (by default `cftest.json` in the
//! working directory). A missing or unreadable file falls back to defaults so
//! the harness works without any configuration; command-line flags override
//! individual values on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "cftest.json";

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub aws: AwsConfig,
    pub report: ReportConfig,
    /// Maximum number of fixtures executed at the same time
    pub jobs: usize,
}

/// How the AWS CLI is invoked by the CloudFront runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Program name or path of the AWS CLI
    pub program: String,
    /// Named profile passed as `--profile`
    pub profile: Option<String>,
    /// Region passed as `--region`
    pub region: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            program: "aws".to_string(),
            profile: None,
            region: None,
        }
    }
}

/// Report layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Minimum width of the fixture name column
    pub min_name_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { min_name_width: 20 }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            aws: AwsConfig::default(),
            report: ReportConfig::default(),
            jobs: 1,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a JSON file
    ///
    /// Returns the defaults when the file does not exist or cannot be parsed.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path);
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path,
                        err
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[Config] No config file at {:?}. Using defaults.", path);
                Self::default()
            }
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path,
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}
