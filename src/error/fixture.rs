// Fixture loading error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Fixture error code constants
///
/// Error code range: 3001-3003
pub struct FixtureErrorCodes {}

impl FixtureErrorCodes {
    /// Fixture file could not be read
    pub const IO: i32 = 3001;

    /// Fixture file is not valid fixture JSON
    pub const PARSE: i32 = 3002;

    /// Fixture directory could not be listed
    pub const DISCOVERY: i32 = 3003;
}

/// Log a fixture error with structured context
pub fn log_fixture_error(err: &FixtureError, context: &str) {
    error!(
        "Fixture error in {}: code={}, component=FixtureLoader, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while locating and loading fixture files
///
/// `Io` and `Parse` are kept apart so callers can tell an unreadable file
/// from one whose content is malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// The file could not be read; `reason` is the OS error text
    Io {
        path: PathBuf,
        kind: io::ErrorKind,
        reason: String,
    },

    /// The file content is not valid JSON or does not match the fixture schema
    Parse { path: PathBuf, reason: String },

    /// A fixture directory could not be listed
    Discovery { path: PathBuf, reason: String },
}

impl FixtureError {
    pub(crate) fn io(path: &Path, err: io::Error) -> Self {
        FixtureError::Io {
            path: path.to_path_buf(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn parse(path: &Path, err: serde_json::Error) -> Self {
        FixtureError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn discovery(path: &Path, err: io::Error) -> Self {
        FixtureError::Discovery {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Path of the fixture (or directory) the error refers to
    pub fn path(&self) -> &Path {
        match self {
            FixtureError::Io { path, .. }
            | FixtureError::Parse { path, .. }
            | FixtureError::Discovery { path, .. } => path,
        }
    }
}

impl ErrorCode for FixtureError {
    fn code(&self) -> i32 {
        match self {
            FixtureError::Io { .. } => FixtureErrorCodes::IO,
            FixtureError::Parse { .. } => FixtureErrorCodes::PARSE,
            FixtureError::Discovery { .. } => FixtureErrorCodes::DISCOVERY,
        }
    }

    fn message(&self) -> String {
        match self {
            FixtureError::Io { path, reason, .. } => {
                format!("open {}: {}", path.display(), reason)
            }
            FixtureError::Parse { path, reason } => {
                format!("parse {}: {}", path.display(), reason)
            }
            FixtureError::Discovery { path, reason } => {
                format!("list {}: {}", path.display(), reason)
            }
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for FixtureError {}
