//! Comparison engine deciding whether a fixture passed.
//!
//! Given one fixture and what the backend produced for it, the engine
//! decodes the output, applies the response body wildcard and compares the
//! error text and output against the expectations. Runners hand over error
//! text already passed through [`strip_error_prefix`]. Differences are
//! rendered with [`diff::render`] so failures read as `-got +want` listings.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::RunError;
use crate::fixtures::Fixture;
use crate::runner::ExecutionResult;

pub mod diff;

/// Generic wrapper text the backend puts in front of function-thrown errors.
pub const BACKEND_ERROR_PREFIX: &str = "The CloudFront function associated with the CloudFront distribution is invalid or could not run. Error: ";

/// Location of the response body in function output.
pub const BODY_DATA_PATH: [&str; 3] = ["response", "body", "data"];

/// Outcome of comparing one execution against its fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub ok: bool,
    pub utilization: u32,
    /// Rendered differences; empty when `ok` is true
    pub failure: String,
}

/// Compare an execution result against the fixture's expectations.
///
/// Fails only when the output cannot be decoded; mismatches produce a
/// failing [`Verdict`].
pub fn compare(fixture: &Fixture, result: &ExecutionResult) -> Result<Verdict, RunError> {
    let mut failures = Vec::new();

    let got_error = result.error_message.as_deref().unwrap_or_default();
    if got_error != fixture.error {
        failures.push(format!(
            "Error (-got +want):\n{}",
            diff::render_strings(got_error, &fixture.error)
        ));
    }

    // Only the actual side collapses; an expected `{}` must see an object.
    let mut output = decode_output(result.output.as_deref())?;
    let expected = fixture.output.as_ref();
    if let (Some(expected), Some(actual)) = (expected, output.as_mut()) {
        apply_body_wildcard(expected, actual);
    }

    let output_diff = diff::render(output.as_ref(), expected);
    if !output_diff.is_empty() {
        failures.push(format!("Output (-got +want):\n{}", output_diff));
    }

    Ok(Verdict {
        ok: failures.is_empty(),
        utilization: result.utilization,
        failure: failures.join("\n\n"),
    })
}

/// Remove the backend's boilerplate wrapper, leaving the function's own text.
///
/// Applied once per execution by the runner that received the message.
pub fn strip_error_prefix(message: &str) -> String {
    message.replacen(BACKEND_ERROR_PREFIX, "", 1)
}

/// Decode function output; `null` and `{}` mean nothing was produced.
pub fn decode_output(raw: Option<&str>) -> Result<Option<Value>, RunError> {
    match raw {
        Some(raw) => Ok(collapse_empty(serde_json::from_str(raw)?)),
        None => Ok(None),
    }
}

fn collapse_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        value => Some(value),
    }
}

/// Let `"data": true` in the expected response body match any string body.
///
/// Only fires when `expected` holds boolean `true` at [`BODY_DATA_PATH`] and
/// `actual` holds a string there; any other shape is left alone and shows
/// up as a normal mismatch. Returns whether `actual` was rewritten.
pub fn apply_body_wildcard(expected: &Value, actual: &mut Value) -> bool {
    nested_bool(expected, &BODY_DATA_PATH) && set_nested_true(actual, &BODY_DATA_PATH)
}

/// True when `value` holds boolean `true` at `keys`, all parents being maps.
pub fn nested_bool(value: &Value, keys: &[&str]) -> bool {
    if keys.is_empty() {
        return false;
    }
    let mut cursor = value;
    for key in keys {
        match cursor.as_object().and_then(|map| map.get(*key)) {
            Some(next) => cursor = next,
            None => return false,
        }
    }
    cursor.as_bool().unwrap_or(false)
}

/// Replace the string at `keys` with `true`; false when there is no string there.
pub fn set_nested_true(value: &mut Value, keys: &[&str]) -> bool {
    let Some((last, parents)) = keys.split_last() else {
        return false;
    };
    let mut cursor = value;
    for key in parents {
        cursor = match cursor {
            Value::Object(map) => match map.get_mut(*key) {
                Some(next) => next,
                None => return false,
            },
            _ => return false,
        };
    }
    match cursor.as_object_mut().and_then(|map| map.get_mut(*last)) {
        Some(slot) if slot.is_string() => {
            *slot = Value::Bool(true);
            true
        }
        _ => false,
    }
}

/// Structural equality: maps ignore key order, sequences compare in order,
/// numbers compare by value regardless of integer/float representation.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        _ => a == b,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests;
