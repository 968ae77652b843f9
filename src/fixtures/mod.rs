//! Fixture model for the CloudFront Function test harness.
//!
//! A fixture is a JSON document holding a partial viewer event, the output
//! the function is expected to produce and the error it is expected to throw.
//! Loading fills every event field the document leaves out with fixed
//! defaults so the backend always receives a complete event.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::FixtureError;

/// Event version sent when the fixture does not specify one.
pub const DEFAULT_EVENT_VERSION: &str = "1.0";

/// Invocation input sent to the execution backend.
///
/// `request` and `response` are left out of the serialized form when unset,
/// which tells the backend the phase carries no such data (as opposed to an
/// explicitly empty object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// A `null` version keeps [`DEFAULT_EVENT_VERSION`].
    #[serde(deserialize_with = "null_as_default_version")]
    pub version: String,
    pub context: Value,
    pub viewer: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            version: DEFAULT_EVENT_VERSION.to_string(),
            context: json!({ "eventType": "viewer-request" }),
            viewer: json!({ "ip": "1.2.3.4" }),
            request: None,
            response: None,
        }
    }
}

/// A single declarative test case.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Fixture {
    /// Source file, used for reporting.
    #[serde(skip)]
    pub path: PathBuf,
    /// Optional display name shown instead of the path.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: Event,
    /// Expected function output; `None` means no output is expected.
    #[serde(default)]
    pub output: Option<Value>,
    /// Expected thrown error text; empty means no error is expected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
}

impl Fixture {
    /// Parse fixture JSON that was read from `path`.
    pub fn from_json(path: impl Into<PathBuf>, data: &[u8]) -> Result<Self, FixtureError> {
        let path = path.into();
        let mut fixture: Fixture =
            serde_json::from_slice(data).map_err(|err| FixtureError::parse(&path, err))?;
        fixture.path = path;
        Ok(fixture)
    }

    /// Name shown in reports: the declared name, or the source path.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.path.display().to_string(),
        }
    }
}

/// Load a single fixture file.
pub fn load_fixture(path: impl AsRef<Path>) -> Result<Fixture, FixtureError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|err| FixtureError::io(path, err))?;
    let fixture = Fixture::from_json(path, &data)?;
    debug!("[Fixtures] Loaded {}", path.display());
    Ok(fixture)
}

/// Load fixtures in the order given.
///
/// The batch is all or none: the first unreadable or malformed file aborts
/// the load and no fixtures are returned.
pub fn load_fixtures<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Fixture>, FixtureError> {
    paths.iter().map(load_fixture).collect()
}

/// Expand fixture arguments into file paths.
///
/// Directories contribute their `*.json` files (not recursing), sorted by
/// file name. Anything else is passed through untouched so a missing file
/// surfaces as an I/O error at load time.
pub fn discover_fixtures<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, FixtureError> {
    let mut fixtures = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            fixtures.push(path.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(path).map_err(|err| FixtureError::discovery(path, err))? {
            let entry = entry.map_err(|err| FixtureError::discovery(path, err))?;
            let candidate = entry.path();
            if candidate.is_file()
                && candidate.extension().and_then(|ext| ext.to_str()) == Some("json")
            {
                found.push(candidate);
            }
        }
        found.sort();
        debug!(
            "[Fixtures] Discovered {} fixtures in {}",
            found.len(),
            path.display()
        );
        fixtures.extend(found);
    }
    Ok(fixtures)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .unwrap_or_else(|| DEFAULT_EVENT_VERSION.to_string()))
}
