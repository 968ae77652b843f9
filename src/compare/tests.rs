use std::path::PathBuf;

use serde_json::{json, Value};

use super::*;
use crate::fixtures::load_fixture;

fn fixture(name: &str) -> Fixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    load_fixture(path).expect("fixture loads")
}

fn request_output(uri: &str) -> String {
    json!({
        "request": {
            "method": "GET",
            "uri": uri,
            "querystring": {},
            "headers": { "host": { "value": "www.example.com" } },
            "cookies": {}
        }
    })
    .to_string()
}

fn response_output(body: Value) -> String {
    json!({
        "response": {
            "statusCode": 200,
            "statusDescription": "OK",
            "headers": {
                "content-type": { "value": "text/plain; charset=utf-8" }
            },
            "body": body
        }
    })
    .to_string()
}

fn executed(output: Option<String>, error: Option<&str>) -> ExecutionResult {
    ExecutionResult {
        output,
        error_message: error.map(str::to_string),
        utilization: 23,
    }
}

fn passed() -> Verdict {
    Verdict {
        ok: true,
        utilization: 23,
        failure: String::new(),
    }
}

#[test]
fn matching_request_passes() {
    let verdict = compare(
        &fixture("request_uri.json"),
        &executed(Some(request_output("/")), None),
    )
    .unwrap();
    assert_eq!(verdict, passed());
}

#[test]
fn matching_response_body_passes() {
    let verdict = compare(
        &fixture("body_string.json"),
        &executed(
            Some(response_output(json!({"encoding": "text", "data": "body"}))),
            None,
        ),
    )
    .unwrap();
    assert_eq!(verdict, passed());
}

#[test]
fn wildcard_body_accepts_any_string() {
    let verdict = compare(
        &fixture("body_wildcard.json"),
        &executed(
            Some(response_output(json!({"encoding": "text", "data": "anything"}))),
            None,
        ),
    )
    .unwrap();
    assert_eq!(verdict, passed());
}

#[test]
fn wildcard_body_rejects_non_string() {
    let verdict = compare(
        &fixture("body_wildcard.json"),
        &executed(
            Some(response_output(json!({"encoding": "text", "data": 123}))),
            None,
        ),
    )
    .unwrap();
    assert!(!verdict.ok);
    assert!(verdict.failure.contains("-   data: 123,"), "{}", verdict.failure);
    assert!(verdict.failure.contains("+   data: true,"), "{}", verdict.failure);
}

#[test]
fn expected_error_passes() {
    let verdict = compare(&fixture("thrown_error.json"), &executed(None, Some("thrown error"))).unwrap();
    assert_eq!(verdict, passed());
}

#[test]
fn expected_error_with_empty_output_passes() {
    let verdict = compare(
        &fixture("thrown_error.json"),
        &executed(Some("{}".into()), Some("thrown error")),
    )
    .unwrap();
    assert_eq!(verdict, passed());
}

#[test]
fn error_text_is_compared_verbatim() {
    let wrapped = format!("{BACKEND_ERROR_PREFIX}thrown error");
    let verdict = compare(&fixture("thrown_error.json"), &executed(None, Some(&wrapped))).unwrap();
    assert!(!verdict.ok);
    assert!(verdict.failure.starts_with("Error (-got +want):\n-\"The CloudFront function"));
}

#[test]
fn expected_empty_object_is_not_absent() {
    let fixture = Fixture::from_json("empty_output.json", br#"{"output": {}}"#).unwrap();
    assert_eq!(fixture.output, Some(json!({})));

    let verdict = compare(&fixture, &executed(None, None)).unwrap();
    assert_eq!(
        verdict,
        Verdict {
            ok: false,
            utilization: 23,
            failure: "Output (-got +want):\n-null\n+{\n+}".to_string(),
        }
    );

    // A reported `{}` decodes to nothing, so it does not satisfy it either.
    let verdict = compare(&fixture, &executed(Some("{}".into()), None)).unwrap();
    assert!(!verdict.ok);
    assert_eq!(verdict.failure, "Output (-got +want):\n-null\n+{\n+}");
}

#[test]
fn no_expectations_pass_only_without_error_or_output() {
    let empty = Fixture::default();
    assert!(compare(&empty, &executed(None, None)).unwrap().ok);
    assert!(compare(&empty, &executed(Some("{}".into()), None)).unwrap().ok);
    assert!(compare(&empty, &executed(Some("null".into()), Some(""))).unwrap().ok);
    assert!(!compare(&empty, &executed(None, Some("boom"))).unwrap().ok);
    assert!(!compare(&empty, &executed(Some(request_output("/")), None)).unwrap().ok);
}

#[test]
fn map_key_order_is_ignored() {
    let mut fixture = Fixture::default();
    fixture.output = Some(json!({"a": 1, "b": 2}));
    let verdict = compare(&fixture, &executed(Some(r#"{"b":2,"a":1}"#.into()), None)).unwrap();
    assert!(verdict.ok);
    assert!(verdict.failure.is_empty());
}

#[test]
fn different_uri_reports_output_diff() {
    let verdict = compare(
        &fixture("request_uri.json"),
        &executed(Some(request_output("/nomatch")), None),
    )
    .unwrap();
    let expected = r#"Output (-got +want):
 {
  request: {
   cookies: {
   },
   headers: {
    host: {
     value: "www.example.com",
    },
   },
   method: "GET",
   querystring: {
   },
-  uri: "/nomatch",
+  uri: "/",
  },
 }"#;
    assert_eq!(
        verdict,
        Verdict {
            ok: false,
            utilization: 23,
            failure: expected.to_string(),
        }
    );
}

#[test]
fn different_body_reports_output_diff() {
    let verdict = compare(
        &fixture("body_string.json"),
        &executed(
            Some(response_output(json!({"encoding": "text", "data": "foo"}))),
            None,
        ),
    )
    .unwrap();
    let expected = r#"Output (-got +want):
 {
  response: {
   body: {
-   data: "foo",
+   data: "body",
    encoding: "text",
   },
   headers: {
    content-type: {
     value: "text/plain; charset=utf-8",
    },
   },
   statusCode: 200,
   statusDescription: "OK",
  },
 }"#;
    assert!(!verdict.ok);
    assert_eq!(verdict.failure, expected);
}

#[test]
fn missing_wildcard_body_reports_output_diff() {
    let verdict = compare(
        &fixture("body_wildcard.json"),
        &executed(Some(response_output(json!({"encoding": "text"}))), None),
    )
    .unwrap();
    let expected = r#"Output (-got +want):
 {
  response: {
   body: {
+   data: true,
    encoding: "text",
   },
   headers: {
    content-type: {
     value: "text/plain; charset=utf-8",
    },
   },
   statusCode: 200,
   statusDescription: "OK",
  },
 }"#;
    assert_eq!(verdict.failure, expected);
}

#[test]
fn different_error_reports_error_diff() {
    let verdict = compare(&fixture("thrown_error.json"), &executed(None, Some("other error"))).unwrap();
    assert_eq!(
        verdict,
        Verdict {
            ok: false,
            utilization: 23,
            failure: "Error (-got +want):\n-\"other error\"\n+\"thrown error\"".to_string(),
        }
    );
}

#[test]
fn error_and_output_diffs_are_joined_by_blank_line() {
    let verdict = compare(
        &fixture("request_uri.json"),
        &executed(Some(request_output("/nomatch")), Some("boom")),
    )
    .unwrap();
    assert!(!verdict.ok);
    assert!(verdict
        .failure
        .starts_with("Error (-got +want):\n-\"boom\"\n+\"\"\n\nOutput (-got +want):\n"));
}

#[test]
fn invalid_output_is_a_decode_error() {
    let err = compare(&fixture("request_uri.json"), &executed(Some("/".into()), None)).unwrap_err();
    assert!(matches!(err, RunError::Decode { .. }));
    assert_eq!(
        err.to_string(),
        "JSON decode error: expected value at line 1 column 1"
    );
}

#[test]
fn decode_collapses_empty_values() {
    assert_eq!(decode_output(None).unwrap(), None);
    assert_eq!(decode_output(Some("{}")).unwrap(), None);
    assert_eq!(decode_output(Some("null")).unwrap(), None);
    assert_eq!(decode_output(Some("[]")).unwrap(), Some(json!([])));
}

#[test]
fn strip_error_prefix_only_touches_the_wrapper() {
    assert_eq!(strip_error_prefix(&format!("{BACKEND_ERROR_PREFIX}boom")), "boom");
    assert_eq!(strip_error_prefix("boom"), "boom");
    assert_eq!(strip_error_prefix(""), "");
}

#[test]
fn nested_bool_requires_true_at_full_path() {
    let nested = json!({"one": {"two": {"three": true}}});
    assert!(nested_bool(&nested, &["one", "two", "three"]));
    assert!(!nested_bool(&json!({"one": {"two": {"three": false}}}), &["one", "two", "three"]));
    assert!(!nested_bool(&json!({"one": {"two": {"three": "value"}}}), &["one", "two", "three"]));
    assert!(!nested_bool(&nested, &["one", "two"]));
    assert!(!nested_bool(&nested, &["one", "two", "three", "oops"]));
    assert!(!nested_bool(&nested, &["one", "oops"]));
    assert!(!nested_bool(&nested, &["oops"]));
    assert!(!nested_bool(&nested, &[]));
    assert!(!nested_bool(&json!(true), &["one"]));
    assert!(!nested_bool(&json!("string"), &["one"]));
}

#[test]
fn set_nested_true_only_replaces_strings() {
    let keys = ["one", "two", "three"];
    let mut value = json!({"one": {"two": {"three": "value"}}});
    assert!(set_nested_true(&mut value, &keys));
    assert_eq!(value, json!({"one": {"two": {"three": true}}}));

    let untouched = json!({"one": {"two": {"three": "value"}}});
    let cases: [(Value, &[&str]); 8] = [
        (json!({"one": {"two": {"three": true}}}), &keys),
        (json!({"one": {"two": {"three": false}}}), &keys),
        (untouched.clone(), &["one", "two"]),
        (untouched.clone(), &["one", "two", "three", "oops"]),
        (untouched.clone(), &["one", "oops"]),
        (untouched.clone(), &["oops"]),
        (untouched.clone(), &[]),
        (json!("string"), &["one"]),
    ];
    for (original, keys) in cases {
        let mut value = original.clone();
        assert!(!set_nested_true(&mut value, keys), "{original} {keys:?}");
        assert_eq!(value, original);
    }
    assert!(!set_nested_true(&mut json!(true), &["one"]));
}

#[test]
fn wildcard_is_ignored_without_expected_true() {
    let expected = json!({"response": {"body": {"data": "body"}}});
    let mut actual = json!({"response": {"body": {"data": "other"}}});
    assert!(!apply_body_wildcard(&expected, &mut actual));
    assert_eq!(actual["response"]["body"]["data"], json!("other"));
}

#[test]
fn numbers_compare_by_value() {
    assert!(values_equal(&json!(200), &json!(200.0)));
    assert!(values_equal(&json!(-1), &json!(-1)));
    assert!(!values_equal(&json!(-1), &json!(u64::MAX)));
    assert!(!values_equal(&json!(1), &json!("1")));
    assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
}
