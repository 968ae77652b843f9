//! Deterministic structural diff rendering.
//!
//! Both trees are walked together with map keys in sorted order. Every line
//! starts with a marker: `-` for content only in the actual ("got") tree,
//! `+` for content only in the expected ("want") tree, and a space for shared
//! content kept for context. Nesting adds one space of indentation per level:
//!
//! ```text
//!  {
//!   request: {
//! -  uri: "/nomatch",
//! +  uri: "/",
//!   },
//!  }
//! ```

use std::collections::BTreeSet;

use serde_json::Value;

use super::values_equal;

/// Render the differences between `got` and `want`.
///
/// `None` stands for an absent value and renders as `null`. Returns an empty
/// string when the two are structurally equal.
pub fn render(got: Option<&Value>, want: Option<&Value>) -> String {
    if optional_equal(got, want) {
        return String::new();
    }
    let mut out = Renderer::default();
    out.diff(0, "", got, want, "");
    out.finish()
}

/// Render the differences between two strings, e.g. error messages.
pub fn render_strings(got: &str, want: &str) -> String {
    render(
        Some(&Value::String(got.to_string())),
        Some(&Value::String(want.to_string())),
    )
}

fn optional_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => values_equal(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Map keys made of ASCII letters, digits, `_` and `-` render bare; any
/// other key is JSON-quoted so it cannot be mistaken for diff structure.
fn key_label(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        Value::String(key.to_string()).to_string()
    }
}

#[derive(Default)]
struct Renderer {
    lines: Vec<String>,
}

impl Renderer {
    fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn line(&mut self, marker: char, depth: usize, text: &str) {
        self.lines
            .push(format!("{marker}{}{text}", " ".repeat(depth)));
    }

    fn diff(
        &mut self,
        depth: usize,
        prefix: &str,
        got: Option<&Value>,
        want: Option<&Value>,
        suffix: &str,
    ) {
        if optional_equal(got, want) {
            self.value(' ', depth, prefix, got, suffix);
            return;
        }

        match (got, want) {
            (Some(Value::Object(got)), Some(Value::Object(want))) => {
                self.line(' ', depth, &format!("{prefix}{{"));
                let keys: BTreeSet<&String> = got.keys().chain(want.keys()).collect();
                for key in keys {
                    let entry = format!("{}: ", key_label(key));
                    match (got.get(key), want.get(key)) {
                        (Some(g), Some(w)) => self.diff(depth + 1, &entry, Some(g), Some(w), ","),
                        (Some(g), None) => self.value('-', depth + 1, &entry, Some(g), ","),
                        (None, Some(w)) => self.value('+', depth + 1, &entry, Some(w), ","),
                        (None, None) => {}
                    }
                }
                self.line(' ', depth, &format!("}}{suffix}"));
            }
            (Some(Value::Array(got)), Some(Value::Array(want))) => {
                self.line(' ', depth, &format!("{prefix}["));
                for idx in 0..got.len().max(want.len()) {
                    match (got.get(idx), want.get(idx)) {
                        (Some(g), Some(w)) => self.diff(depth + 1, "", Some(g), Some(w), ","),
                        (Some(g), None) => self.value('-', depth + 1, "", Some(g), ","),
                        (None, Some(w)) => self.value('+', depth + 1, "", Some(w), ","),
                        (None, None) => {}
                    }
                }
                self.line(' ', depth, &format!("]{suffix}"));
            }
            _ => {
                self.value('-', depth, prefix, got, suffix);
                self.value('+', depth, prefix, want, suffix);
            }
        }
    }

    fn value(&mut self, marker: char, depth: usize, prefix: &str, value: Option<&Value>, suffix: &str) {
        match value {
            Some(Value::Object(map)) => {
                self.line(marker, depth, &format!("{prefix}{{"));
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                for (key, child) in entries {
                    let entry = format!("{}: ", key_label(key));
                    self.value(marker, depth + 1, &entry, Some(child), ",");
                }
                self.line(marker, depth, &format!("}}{suffix}"));
            }
            Some(Value::Array(items)) => {
                self.line(marker, depth, &format!("{prefix}["));
                for child in items {
                    self.value(marker, depth + 1, "", Some(child), ",");
                }
                self.line(marker, depth, &format!("]{suffix}"));
            }
            Some(scalar) => self.line(marker, depth, &format!("{prefix}{scalar}{suffix}")),
            None => self.line(marker, depth, &format!("{prefix}null{suffix}")),
        }
    }
}
